use async_trait::async_trait;
use board_common::wire::CreatePersonRequest;
use board_common::{BoardAssignments, Person};

use crate::errors::BoardResult;

/// Remote column list and assignment table backing the board.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Ordered column titles (`GET /api/kanban-columns`).
    async fn fetch_column_titles(&self) -> BoardResult<Vec<String>>;

    /// Replace the ordered column titles (`PUT /api/kanban-columns`).
    async fn save_column_titles(&self, titles: &[String]) -> BoardResult<()>;

    /// Column id → person ids (`GET /api/people/board`).
    async fn fetch_assignments(&self) -> BoardResult<BoardAssignments>;

    async fn create_assignment(&self, person_id: &str, column_id: &str) -> BoardResult<()>;

    async fn move_assignment(
        &self,
        person_id: &str,
        old_column_id: &str,
        new_column_id: &str,
    ) -> BoardResult<()>;

    async fn delete_assignment(&self, person_id: &str, column_id: &str) -> BoardResult<()>;
}

/// The contacts list the board cross-references when building cards.
#[async_trait]
pub trait PeopleRepository: Send + Sync {
    async fn list_people(&self) -> BoardResult<Vec<Person>>;

    async fn create_person(&self, request: &CreatePersonRequest) -> BoardResult<Person>;

    async fn delete_person(&self, person_id: &str) -> BoardResult<()>;
}
