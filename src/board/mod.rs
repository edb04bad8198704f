//! Network board: client-side projection of the person ↔ column assignments.
//!
//! ## Overview
//!
//! The board is a kanban of contacts. The durable source of truth is the
//! remote assignment table; the column/card tree held here is a derived,
//! rebuildable projection kept in sync through optimistic updates.
//!
//! ## Module Map
//!
//! ```text
//!  DragIntent ──> drag.rs (DragSession: Idle → Dragging → Hovering → Idle)
//!                    │ DropTarget
//!                    v
//!               reconciler.rs (Reconciler)
//!                    │ optimistic mutation of ColumnStore, then exactly one
//!                    │ create/move request; snapshot restored on failure
//!                    v
//!               repository.rs (BoardRepository / PeopleRepository traits)
//!                    │
//!                    v
//!               http.rs (HttpBoardClient, reqwest) ──HTTP──> service::api
//! ```
//!
//! ## Supporting Modules
//!
//! | Module        | Responsibility                                            |
//! |---------------|-----------------------------------------------------------|
//! | `store`       | `ColumnStore`: ordered columns, slug ids, title edits     |
//! | `assignments` | `AssignmentFetcher`: assignments → cards, `fetch_board`   |
//! | `poller`      | `BoardPoller`: periodic refresh published on a `watch`    |

pub mod assignments;
pub mod drag;
pub mod http;
pub mod poller;
pub mod reconciler;
pub mod repository;
pub mod store;

#[cfg(test)]
pub(crate) mod fake;

pub use assignments::{AssignmentFetcher, fetch_board};
pub use drag::{DragIntent, DragSession};
pub use http::HttpBoardClient;
pub use poller::BoardPoller;
pub use reconciler::{AssignmentChange, ColumnDeletion, ReconcileOutcome, Reconciler};
pub use repository::{BoardRepository, PeopleRepository};
pub use store::ColumnStore;
