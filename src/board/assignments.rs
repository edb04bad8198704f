use std::collections::HashMap;

use board_common::{BoardAssignments, Card, Person};
use tracing::debug;

use super::repository::{BoardRepository, PeopleRepository};
use super::store::ColumnStore;
use crate::errors::BoardResult;

/// Loads person → column mappings and turns them into cards.
pub struct AssignmentFetcher;

/// Counts from one hydration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub placed: usize,
    pub unknown_people: usize,
    pub unknown_columns: usize,
}

impl AssignmentFetcher {
    pub async fn load_assignments(repo: &dyn BoardRepository) -> BoardResult<BoardAssignments> {
        repo.fetch_assignments().await
    }

    /// Replace every card in `store` with cards built from `assignments`.
    ///
    /// Assignments naming a person missing from `people` are dropped without
    /// an error, as are assignments to columns the store does not know.
    pub fn hydrate(
        store: &mut ColumnStore,
        assignments: &BoardAssignments,
        people: &[Person],
    ) -> HydrationReport {
        let by_id: HashMap<&str, &Person> = people.iter().map(|p| (p.id.as_str(), p)).collect();
        let mut report = HydrationReport::default();
        store.clear_cards();

        for (column_id, person_ids) in assignments {
            if !store.contains_column(column_id) {
                debug!(column_id = %column_id, count = person_ids.len(), "assignments for unknown column ignored");
                report.unknown_columns += person_ids.len();
                continue;
            }
            for person_id in person_ids {
                let Some(person) = by_id.get(person_id.as_str()) else {
                    debug!(person_id = %person_id, column_id = %column_id, "assignment for unknown person dropped");
                    report.unknown_people += 1;
                    continue;
                };
                // column was checked above and push_card only fails on unknown columns
                if let Ok(true) = store.push_card(column_id, Card::for_person(person)) {
                    report.placed += 1;
                }
            }
        }
        report
    }
}

/// Fetch people, columns and assignments and build the full projection.
pub async fn fetch_board(
    board_repo: &dyn BoardRepository,
    people_repo: &dyn PeopleRepository,
) -> BoardResult<(ColumnStore, Vec<Person>)> {
    let people = people_repo.list_people().await?;
    let mut store = ColumnStore::load(board_repo).await?;
    let assignments = AssignmentFetcher::load_assignments(board_repo).await?;
    let report = AssignmentFetcher::hydrate(&mut store, &assignments, &people);
    debug!(
        columns = store.columns().len(),
        placed = report.placed,
        unknown_people = report.unknown_people,
        unknown_columns = report.unknown_columns,
        "board hydrated"
    );
    Ok((store, people))
}
