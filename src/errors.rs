//! Typed error hierarchy for the network board.
//!
//! Two top-level enums cover the two sides:
//! - `BoardError`: client-side store, drag session, reconciler and HTTP repository failures
//! - `ServerError`: REST server startup and storage failures

use thiserror::Error;

/// Generic message shown when a column cascade could not be completed.
pub const COLUMN_DELETE_FAILED: &str = "Failed to delete column. Please try again.";

/// Generic message shown when deleting a person fails.
pub const PERSON_DELETE_FAILED: &str = "Failed to delete person. Please try again.";

/// Errors from the client-side board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Card '{0}' not found")]
    UnknownCard(String),

    #[error("Person '{0}' not found")]
    UnknownPerson(String),

    #[error("Column '{id}' already exists")]
    DuplicateColumn { id: String },

    #[error("Cannot {intent} while {state}")]
    InvalidTransition {
        intent: &'static str,
        state: &'static str,
    },

    #[error("{user_message}")]
    Remote {
        user_message: &'static str,
        #[source]
        source: Box<BoardError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BoardError {
    /// Wrap a remote failure with the generic message shown to the user.
    pub fn remote(user_message: &'static str, source: BoardError) -> Self {
        BoardError::Remote {
            user_message,
            source: Box::new(source),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            BoardError::Unauthorized(_) => true,
            BoardError::Remote { source, .. } => source.is_unauthorized(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BoardError::Decode(err.to_string())
        } else {
            BoardError::Transport(err)
        }
    }
}

/// Errors from the REST server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[source] anyhow::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type BoardResult<T> = std::result::Result<T, BoardError>;
