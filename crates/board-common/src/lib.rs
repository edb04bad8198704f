//! Shared domain and wire types for the network board.
//!
//! Both sides of the board use these: the REST server persists them and the
//! client-side reconciler projects them into columns and cards.

pub mod models;
pub mod slug;
pub mod wire;

pub use models::{Assignment, BoardAssignments, Card, Column, Person, group_assignments};
pub use slug::{column_id, slugify};
