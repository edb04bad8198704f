use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use board_common::wire::CreatePersonRequest;
use board_common::{Assignment, BoardAssignments, Person, group_assignments};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::ServerError;

/// Async-safe handle to the board database.
///
/// Wraps `BoardDb` behind `Arc<Mutex>` and runs all access on tokio's
/// blocking thread pool via `spawn_blocking`, so synchronous SQLite I/O never
/// ties up async worker threads.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<std::sync::Mutex<BoardDb>>,
}

impl DbHandle {
    pub fn new(db: BoardDb) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(db)),
        }
    }

    /// Run a closure with access to the database on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&BoardDb) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db.lock().map_err(|_| ServerError::LockPoisoned)?;
            f(&guard)
        })
        .await
        .context("DB task panicked")?
    }
}

/// Outcome of `PUT /api/people/board` at the storage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The old row was re-pointed at the new column.
    Moved,
    /// No old row existed, so the new one was inserted.
    Inserted,
    /// The person was already in the new column; the old row was removed.
    Merged,
    /// Old and new column are the same and the row already existed.
    Unchanged,
}

pub struct BoardDb {
    conn: Connection,
}

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        starred: row.get(4)?,
        category: row.get(5)?,
        address: row.get(6)?,
    })
}

const PERSON_COLUMNS: &str = "id, name, email, phone, starred, category, address";

impl BoardDb {
    /// Open (or create) a SQLite database at the given path and run migrations.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Create an in-memory SQLite database (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        self.run_migrations().context("Failed to run migrations")?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS people (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT,
                    phone TEXT,
                    starred INTEGER NOT NULL DEFAULT 0,
                    category TEXT,
                    address TEXT,
                    created_at TEXT NOT NULL DEFAULT (datetime('now'))
                );

                CREATE TABLE IF NOT EXISTS kanban_columns (
                    position INTEGER PRIMARY KEY,
                    title TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS board_assignments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    person_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
                    column_id TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    UNIQUE(person_id, column_id)
                );

                CREATE INDEX IF NOT EXISTS idx_board_assignments_column
                    ON board_assignments(column_id);
                ",
            )
            .context("Failed to create tables")?;
        Ok(())
    }

    // ── People ────────────────────────────────────────────────────────

    pub fn create_person(&self, id: &str, req: &CreatePersonRequest) -> Result<Person> {
        self.conn
            .execute(
                "INSERT INTO people (id, name, email, phone, starred, category, address)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    req.name,
                    req.email,
                    req.phone,
                    req.starred,
                    req.category,
                    req.address
                ],
            )
            .context("Failed to insert person")?;
        self.get_person(id)?
            .context("Person not found after insert")
    }

    pub fn list_people(&self) -> Result<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM people ORDER BY created_at, rowid",
                PERSON_COLUMNS
            ))
            .context("Failed to prepare list_people")?;
        let rows = stmt
            .query_map([], person_from_row)
            .context("Failed to query people")?;
        let mut people = Vec::new();
        for row in rows {
            people.push(row.context("Failed to read person row")?);
        }
        Ok(people)
    }

    pub fn get_person(&self, id: &str) -> Result<Option<Person>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM people WHERE id = ?1", PERSON_COLUMNS),
                params![id],
                person_from_row,
            )
            .optional()
            .context("Failed to query person")
    }

    /// Delete a person. Their board assignments go with them.
    pub fn delete_person(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM people WHERE id = ?1", params![id])
            .context("Failed to delete person")?;
        Ok(affected > 0)
    }

    // ── Columns ───────────────────────────────────────────────────────

    pub fn get_column_titles(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM kanban_columns ORDER BY position")
            .context("Failed to prepare get_column_titles")?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .context("Failed to query columns")?;
        let mut titles = Vec::new();
        for row in rows {
            titles.push(row.context("Failed to read column row")?);
        }
        Ok(titles)
    }

    /// Replace the whole ordered title list.
    pub fn replace_column_titles(&self, titles: &[String]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;
        tx.execute("DELETE FROM kanban_columns", [])
            .context("Failed to clear columns")?;
        for (position, title) in titles.iter().enumerate() {
            tx.execute(
                "INSERT INTO kanban_columns (position, title) VALUES (?1, ?2)",
                params![position as i64, title],
            )
            .context("Failed to insert column")?;
        }
        tx.commit().context("Failed to commit columns")?;
        Ok(())
    }

    // ── Assignments ───────────────────────────────────────────────────

    /// Column id → person ids, each list in insertion order.
    pub fn get_assignments(&self) -> Result<BoardAssignments> {
        let mut stmt = self
            .conn
            .prepare("SELECT column_id, person_id FROM board_assignments ORDER BY id")
            .context("Failed to prepare get_assignments")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Assignment {
                    column_id: row.get(0)?,
                    person_id: row.get(1)?,
                })
            })
            .context("Failed to query assignments")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read assignment row")?;
        Ok(group_assignments(rows))
    }

    pub fn has_assignment(&self, person_id: &str, column_id: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM board_assignments WHERE person_id = ?1 AND column_id = ?2",
                params![person_id, column_id],
                |row| row.get(0),
            )
            .context("Failed to query assignment")?;
        Ok(count > 0)
    }

    /// Insert the pair; returns false when it already existed.
    pub fn create_assignment(&self, person_id: &str, column_id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO board_assignments (person_id, column_id) VALUES (?1, ?2)",
                params![person_id, column_id],
            )
            .context("Failed to insert assignment")?;
        Ok(affected > 0)
    }

    pub fn move_assignment(
        &self,
        person_id: &str,
        old_column_id: &str,
        new_column_id: &str,
    ) -> Result<MoveResult> {
        if old_column_id == new_column_id {
            return Ok(if self.create_assignment(person_id, new_column_id)? {
                MoveResult::Inserted
            } else {
                MoveResult::Unchanged
            });
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;
        let result = if self.has_assignment(person_id, new_column_id)? {
            tx.execute(
                "DELETE FROM board_assignments WHERE person_id = ?1 AND column_id = ?2",
                params![person_id, old_column_id],
            )
            .context("Failed to delete old assignment")?;
            MoveResult::Merged
        } else {
            let updated = tx
                .execute(
                    "UPDATE board_assignments SET column_id = ?3
                     WHERE person_id = ?1 AND column_id = ?2",
                    params![person_id, old_column_id, new_column_id],
                )
                .context("Failed to move assignment")?;
            if updated > 0 {
                MoveResult::Moved
            } else {
                tx.execute(
                    "INSERT INTO board_assignments (person_id, column_id) VALUES (?1, ?2)",
                    params![person_id, new_column_id],
                )
                .context("Failed to insert assignment")?;
                MoveResult::Inserted
            }
        };
        tx.commit().context("Failed to commit move")?;
        Ok(result)
    }

    pub fn delete_assignment(&self, person_id: &str, column_id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute(
                "DELETE FROM board_assignments WHERE person_id = ?1 AND column_id = ?2",
                params![person_id, column_id],
            )
            .context("Failed to delete assignment")?;
        Ok(affected > 0)
    }
}
