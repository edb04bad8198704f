use std::sync::Arc;

use board_common::models::card_id;
use board_common::wire::CreatePersonRequest;
use board_common::{Card, Column, Person};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::assignments::fetch_board;
use super::drag::{DragIntent, DragSession, DragSubject, DropTarget};
use super::repository::{BoardRepository, PeopleRepository};
use super::store::ColumnStore;
use crate::errors::{BoardError, BoardResult, COLUMN_DELETE_FAILED, PERSON_DELETE_FAILED};

/// The remote write a drop translated into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentChange {
    Created {
        person_id: String,
        column_id: String,
    },
    Moved {
        person_id: String,
        from: String,
        to: String,
    },
}

/// Result of reconciling one drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Nothing changed and no request was sent.
    NoOp,
    /// Applied locally and accepted remotely.
    Committed { change: AssignmentChange },
    /// Applied locally, rejected remotely, and reverted to the pre-drop board.
    RolledBack {
        change: AssignmentChange,
        reason: String,
    },
}

impl ReconcileOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ReconcileOutcome::Committed { .. })
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, ReconcileOutcome::RolledBack { .. })
    }
}

/// Result of deleting a column and its assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDeletion {
    pub column: Column,
    pub attempted: usize,
    pub failed: usize,
    pub titles_saved: bool,
}

impl ColumnDeletion {
    /// Generic message for the user when any part of the cascade failed.
    pub fn user_message(&self) -> Option<&'static str> {
        (self.failed > 0 || !self.titles_saved).then_some(COLUMN_DELETE_FAILED)
    }
}

/// Keeps the local column/card projection in sync with the remote
/// assignment table through optimistic updates.
pub struct Reconciler {
    board_repo: Arc<dyn BoardRepository>,
    people_repo: Arc<dyn PeopleRepository>,
    store: ColumnStore,
    people: Vec<Person>,
    session: DragSession,
    selected: Option<String>,
}

impl Reconciler {
    /// An empty board; call [`Reconciler::refresh`] to populate it.
    pub fn new(board_repo: Arc<dyn BoardRepository>, people_repo: Arc<dyn PeopleRepository>) -> Self {
        Self {
            board_repo,
            people_repo,
            store: ColumnStore::new(),
            people: Vec::new(),
            session: DragSession::Idle,
            selected: None,
        }
    }

    pub async fn load(
        board_repo: Arc<dyn BoardRepository>,
        people_repo: Arc<dyn PeopleRepository>,
    ) -> BoardResult<Self> {
        let mut reconciler = Self::new(board_repo, people_repo);
        reconciler.refresh().await?;
        Ok(reconciler)
    }

    /// Rebuild columns, people and cards from the remote side.
    pub async fn refresh(&mut self) -> BoardResult<()> {
        let (store, people) =
            fetch_board(self.board_repo.as_ref(), self.people_repo.as_ref()).await?;
        self.store = store;
        self.people = people;
        if let Some(selected) = &self.selected
            && !self.people.iter().any(|p| &p.id == selected)
        {
            self.selected = None;
        }
        Ok(())
    }

    pub fn board(&self) -> &ColumnStore {
        &self.store
    }

    pub fn columns(&self) -> &[Column] {
        self.store.columns()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn person(&self, person_id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == person_id)
    }

    pub fn select(&mut self, person_id: &str) -> BoardResult<()> {
        if self.person(person_id).is_none() {
            return Err(BoardError::UnknownPerson(person_id.to_string()));
        }
        self.selected = Some(person_id.to_string());
        Ok(())
    }

    pub fn selected(&self) -> Option<&Person> {
        self.selected.as_deref().and_then(|id| self.person(id))
    }

    /// Feed one drag intent. Only a drop over a column yields an outcome.
    pub async fn apply(&mut self, intent: DragIntent) -> BoardResult<Option<ReconcileOutcome>> {
        match &intent {
            DragIntent::BeginDrag { card_id } if self.session.is_idle() => {
                if self.store.find_card(card_id).is_none() {
                    return Err(BoardError::UnknownCard(card_id.clone()));
                }
            }
            DragIntent::BeginDragNew { person_id } if self.session.is_idle() => {
                if self.person(person_id).is_none() {
                    return Err(BoardError::UnknownPerson(person_id.clone()));
                }
            }
            DragIntent::HoverColumn { column_id } if !self.session.is_idle() => {
                if !self.store.contains_column(column_id) {
                    return Err(BoardError::UnknownColumn(column_id.clone()));
                }
            }
            _ => {}
        }

        let was_dragging = !self.session.is_idle();
        match self.session.advance(intent)? {
            Some(target) => self.reconcile_drop(target).await.map(Some),
            None if was_dragging && self.session.is_idle() => Ok(Some(ReconcileOutcome::NoOp)),
            None => Ok(None),
        }
    }

    /// Place a person in a column as a complete gesture.
    pub async fn add_person(
        &mut self,
        person_id: &str,
        column_id: &str,
    ) -> BoardResult<ReconcileOutcome> {
        self.run_gesture(
            DragIntent::BeginDragNew {
                person_id: person_id.to_string(),
            },
            column_id,
        )
        .await
    }

    /// Move an existing card to another column as a complete gesture.
    pub async fn move_card(
        &mut self,
        card_id: &str,
        column_id: &str,
    ) -> BoardResult<ReconcileOutcome> {
        self.run_gesture(
            DragIntent::BeginDrag {
                card_id: card_id.to_string(),
            },
            column_id,
        )
        .await
    }

    async fn run_gesture(
        &mut self,
        begin: DragIntent,
        column_id: &str,
    ) -> BoardResult<ReconcileOutcome> {
        self.apply(begin).await?;
        let hovered = self
            .apply(DragIntent::HoverColumn {
                column_id: column_id.to_string(),
            })
            .await;
        if let Err(err) = hovered {
            self.session = DragSession::Idle;
            return Err(err);
        }
        Ok(self
            .apply(DragIntent::Drop)
            .await?
            .unwrap_or(ReconcileOutcome::NoOp))
    }

    async fn reconcile_drop(&mut self, target: DropTarget) -> BoardResult<ReconcileOutcome> {
        let (person_id, card) = match &target.subject {
            DragSubject::Card { card_id } => {
                let card = self
                    .store
                    .find_card(card_id)
                    .cloned()
                    .ok_or_else(|| BoardError::UnknownCard(card_id.clone()))?;
                (card.person_id.clone(), card)
            }
            DragSubject::NewPerson { person_id } => {
                let person = self
                    .person(person_id)
                    .ok_or_else(|| BoardError::UnknownPerson(person_id.clone()))?;
                (person_id.clone(), Card::for_person(person))
            }
        };
        let new_column = target.column_id;
        if !self.store.contains_column(&new_column) {
            return Err(BoardError::UnknownColumn(new_column));
        }

        let old_column = self.store.column_of_card(&card_id(&person_id)).map(str::to_string);
        if self
            .store
            .column(&new_column)
            .is_some_and(|c| c.contains_person(&person_id))
        {
            return Ok(ReconcileOutcome::NoOp);
        }

        let change = match old_column {
            None => AssignmentChange::Created {
                person_id: person_id.clone(),
                column_id: new_column.clone(),
            },
            Some(from) => AssignmentChange::Moved {
                person_id: person_id.clone(),
                from,
                to: new_column.clone(),
            },
        };

        let snapshot = self.store.clone();
        self.store.remove_card_everywhere(&card.id);
        self.store.push_card(&new_column, card)?;

        let result = match &change {
            AssignmentChange::Created {
                person_id,
                column_id,
            } => self.board_repo.create_assignment(person_id, column_id).await,
            AssignmentChange::Moved {
                person_id,
                from,
                to,
            } => self.board_repo.move_assignment(person_id, from, to).await,
        };

        match result {
            Ok(()) => {
                info!(?change, "assignment committed");
                Ok(ReconcileOutcome::Committed { change })
            }
            Err(err) => {
                warn!(?change, error = %err, "assignment rejected, rolling back");
                self.store = snapshot;
                Ok(ReconcileOutcome::RolledBack {
                    change,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Add a column locally and persist the title list.
    pub async fn add_column(&mut self, title: &str) -> BoardResult<String> {
        let id = self.store.add_column(title)?.id.clone();
        if let Err(err) = self.store.save(self.board_repo.as_ref()).await {
            self.store.remove_column(&id)?;
            return Err(err);
        }
        Ok(id)
    }

    /// Rename a column (its id is kept) and persist the title list.
    pub async fn rename_column(&mut self, column_id: &str, title: &str) -> BoardResult<()> {
        let previous = self
            .store
            .column(column_id)
            .map(|c| c.title.clone())
            .ok_or_else(|| BoardError::UnknownColumn(column_id.to_string()))?;
        self.store.rename_column(column_id, title)?;
        if let Err(err) = self.store.save(self.board_repo.as_ref()).await {
            self.store.rename_column(column_id, &previous)?;
            return Err(err);
        }
        Ok(())
    }

    /// Move a column to a new position and persist the title list.
    pub async fn reorder_column(&mut self, column_id: &str, new_index: usize) -> BoardResult<()> {
        let snapshot = self.store.clone();
        self.store.reorder_column(column_id, new_index)?;
        if let Err(err) = self.store.save(self.board_repo.as_ref()).await {
            self.store = snapshot;
            return Err(err);
        }
        Ok(())
    }

    /// Delete every assignment in the column, then remove it.
    ///
    /// The per-card deletions run concurrently and are all awaited before the
    /// column leaves local state. Failed deletions are logged; the column is
    /// removed regardless.
    pub async fn delete_column(&mut self, column_id: &str) -> BoardResult<ColumnDeletion> {
        let cards = self
            .store
            .column(column_id)
            .map(|c| c.cards.clone())
            .ok_or_else(|| BoardError::UnknownColumn(column_id.to_string()))?;

        let repo = self.board_repo.as_ref();
        let results = join_all(
            cards
                .iter()
                .map(|card| repo.delete_assignment(&card.person_id, column_id)),
        )
        .await;

        let mut failed = 0;
        for (card, result) in cards.iter().zip(&results) {
            if let Err(err) = result {
                warn!(person_id = %card.person_id, column_id = %column_id, error = %err, "failed to delete assignment");
                failed += 1;
            }
        }
        if failed > 0 {
            warn!(column_id = %column_id, failed, total = cards.len(), "column deletion partially failed");
        }

        let column = self.store.remove_column(column_id)?;
        let titles_saved = match self.store.save(repo).await {
            Ok(()) => true,
            Err(err) => {
                warn!(column_id = %column_id, error = %err, "failed to persist column list");
                false
            }
        };

        Ok(ColumnDeletion {
            column,
            attempted: cards.len(),
            failed,
            titles_saved,
        })
    }

    /// Create a contact and add it to the local people list.
    pub async fn create_person(&mut self, request: &CreatePersonRequest) -> BoardResult<Person> {
        let person = self.people_repo.create_person(request).await?;
        self.people.push(person.clone());
        Ok(person)
    }

    /// Delete a person remotely, then drop them from the people list, every
    /// column, and the selection.
    pub async fn delete_person(&mut self, person_id: &str) -> BoardResult<()> {
        if let Err(err) = self.people_repo.delete_person(person_id).await {
            warn!(person_id = %person_id, error = %err, "failed to delete person");
            return Err(BoardError::remote(PERSON_DELETE_FAILED, err));
        }
        self.people.retain(|p| p.id != person_id);
        self.store.remove_person(person_id);
        if self.selected.as_deref() == Some(person_id) {
            self.selected = None;
        }
        info!(person_id = %person_id, "person deleted");
        Ok(())
    }
}
