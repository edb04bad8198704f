//! Drag gestures as a replayable sequence of intents.
//!
//! ```text
//! Idle ──BeginDrag──> Dragging ──HoverColumn──> Hovering ──Drop──> Idle
//!                        │                        │  ↺ HoverColumn
//!                        └──── Cancel / Drop ─────┴──────────────> Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BoardError, BoardResult};

/// One step of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum DragIntent {
    /// Pick up a card that is already on the board.
    BeginDrag { card_id: String },
    /// Pick up a person from the search dropdown.
    BeginDragNew { person_id: String },
    HoverColumn { column_id: String },
    Drop,
    Cancel,
}

impl DragIntent {
    fn name(&self) -> &'static str {
        match self {
            DragIntent::BeginDrag { .. } | DragIntent::BeginDragNew { .. } => "begin a drag",
            DragIntent::HoverColumn { .. } => "hover a column",
            DragIntent::Drop => "drop",
            DragIntent::Cancel => "cancel",
        }
    }
}

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSubject {
    Card { card_id: String },
    NewPerson { person_id: String },
}

/// Ephemeral state of the current gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        subject: DragSubject,
    },
    Hovering {
        subject: DragSubject,
        column_id: String,
    },
}

/// A completed gesture: the subject and the column it was released over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub subject: DragSubject,
    pub column_id: String,
}

impl DragSession {
    fn state_name(&self) -> &'static str {
        match self {
            DragSession::Idle => "idle",
            DragSession::Dragging { .. } => "dragging",
            DragSession::Hovering { .. } => "hovering",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DragSession::Idle)
    }

    pub fn subject(&self) -> Option<&DragSubject> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging { subject } | DragSession::Hovering { subject, .. } => {
                Some(subject)
            }
        }
    }

    pub fn hovered_column(&self) -> Option<&str> {
        match self {
            DragSession::Hovering { column_id, .. } => Some(column_id),
            _ => None,
        }
    }

    /// Advance the state machine. Returns the drop target when a drop over a
    /// column ends the gesture. An invalid transition leaves the state as it was.
    pub fn advance(&mut self, intent: DragIntent) -> BoardResult<Option<DropTarget>> {
        let invalid = BoardError::InvalidTransition {
            intent: intent.name(),
            state: self.state_name(),
        };
        let current = std::mem::take(self);
        let (next, target) = match (current, intent) {
            (DragSession::Idle, DragIntent::BeginDrag { card_id }) => (
                DragSession::Dragging {
                    subject: DragSubject::Card { card_id },
                },
                None,
            ),
            (DragSession::Idle, DragIntent::BeginDragNew { person_id }) => (
                DragSession::Dragging {
                    subject: DragSubject::NewPerson { person_id },
                },
                None,
            ),
            (
                DragSession::Dragging { subject } | DragSession::Hovering { subject, .. },
                DragIntent::HoverColumn { column_id },
            ) => (DragSession::Hovering { subject, column_id }, None),
            (DragSession::Hovering { subject, column_id }, DragIntent::Drop) => {
                (DragSession::Idle, Some(DropTarget { subject, column_id }))
            }
            (DragSession::Dragging { .. }, DragIntent::Drop) => (DragSession::Idle, None),
            (_, DragIntent::Cancel) => (DragSession::Idle, None),
            (current, _) => {
                *self = current;
                return Err(invalid);
            }
        };
        *self = next;
        Ok(target)
    }
}
