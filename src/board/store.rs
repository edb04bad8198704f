use board_common::{Card, Column, column_id, slugify};
use tracing::warn;

use super::repository::BoardRepository;
use crate::errors::{BoardError, BoardResult};

/// Ordered columns and their cards for one session.
///
/// Column ids are derived from titles when columns are loaded or added and
/// are never recomputed afterwards; renaming only touches the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnStore {
    columns: Vec<Column>,
}

impl ColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the title list and derive column ids from it.
    pub async fn load(repo: &dyn BoardRepository) -> BoardResult<Self> {
        let titles = repo.fetch_column_titles().await?;
        Ok(Self::from_titles(&titles))
    }

    /// Build columns from persisted titles. Titles that slugify to an id
    /// already seen collapse into the first column with that id.
    pub fn from_titles(titles: &[String]) -> Self {
        let mut columns: Vec<Column> = Vec::with_capacity(titles.len());
        for (index, title) in titles.iter().enumerate() {
            let id = column_id(title, index);
            if columns.iter().any(|c| c.id == id) {
                warn!(column_id = %id, title = %title, "column title collides with an earlier column, merging");
                continue;
            }
            columns.push(Column::new(id, title.clone()));
        }
        Self { columns }
    }

    /// Persist the ordered title list. Cards are never part of this payload.
    pub async fn save(&self, repo: &dyn BoardRepository) -> BoardResult<()> {
        repo.save_column_titles(&self.titles()).await
    }

    pub fn titles(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.title.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn column_mut(&mut self, id: &str) -> BoardResult<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| BoardError::UnknownColumn(id.to_string()))
    }

    pub fn contains_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    /// Append a column, deriving its id from the title once.
    pub fn add_column(&mut self, title: &str) -> BoardResult<&Column> {
        let mut index = self.columns.len();
        let mut id = column_id(title, index);
        // Untitled fallback ids skip numbers still held after a deletion.
        while slugify(title).is_empty() && self.contains_column(&id) {
            index += 1;
            id = column_id(title, index);
        }
        if self.contains_column(&id) {
            return Err(BoardError::DuplicateColumn { id });
        }
        self.columns.push(Column::new(id, title));
        Ok(&self.columns[self.columns.len() - 1])
    }

    /// Change a column's title; its id stays the same.
    pub fn rename_column(&mut self, id: &str, title: &str) -> BoardResult<()> {
        self.column_mut(id)?.title = title.to_string();
        Ok(())
    }

    /// Move a column to `new_index`, clamped to the end of the list.
    pub fn reorder_column(&mut self, id: &str, new_index: usize) -> BoardResult<()> {
        let from = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| BoardError::UnknownColumn(id.to_string()))?;
        let column = self.columns.remove(from);
        let to = new_index.min(self.columns.len());
        self.columns.insert(to, column);
        Ok(())
    }

    pub fn remove_column(&mut self, id: &str) -> BoardResult<Column> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| BoardError::UnknownColumn(id.to_string()))?;
        Ok(self.columns.remove(index))
    }

    /// Id of the first column holding `card_id`.
    pub fn column_of_card(&self, card_id: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.contains_card(card_id))
            .map(|c| c.id.as_str())
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|card| card.id == card_id)
    }

    /// Ids of every column the person currently appears in.
    pub fn columns_containing(&self, person_id: &str) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.contains_person(person_id))
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Append a card unless the column already holds one for the same person.
    pub fn push_card(&mut self, column_id: &str, card: Card) -> BoardResult<bool> {
        let column = self.column_mut(column_id)?;
        if column.contains_person(&card.person_id) {
            return Ok(false);
        }
        column.cards.push(card);
        Ok(true)
    }

    pub fn remove_card_everywhere(&mut self, card_id: &str) {
        for column in &mut self.columns {
            column.cards.retain(|c| c.id != card_id);
        }
    }

    pub fn remove_person(&mut self, person_id: &str) {
        for column in &mut self.columns {
            column.cards.retain(|c| c.person_id != person_id);
        }
    }

    pub fn clear_cards(&mut self) {
        for column in &mut self.columns {
            column.cards.clear();
        }
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
