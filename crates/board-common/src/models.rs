use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix every card id carries in front of the person id.
pub const CARD_ID_PREFIX: &str = "card-";

/// A contact in the network. `id` is immutable and used as the foreign key
/// everywhere else on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
            starred: false,
            category: None,
            address: None,
        }
    }
}

/// The placement of a person inside a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub person_id: String,
    pub person_name: String,
}

impl Card {
    pub fn for_person(person: &Person) -> Self {
        Self {
            id: card_id(&person.id),
            person_id: person.id.clone(),
            person_name: person.name.clone(),
        }
    }
}

/// Card ids are always `card-{personId}`.
pub fn card_id(person_id: &str) -> String {
    format!("{}{}", CARD_ID_PREFIX, person_id)
}

/// A named bucket on the board. `id` is derived from the title once and is
/// never recomputed during a session, even when the title is edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn contains_person(&self, person_id: &str) -> bool {
        self.cards.iter().any(|c| c.person_id == person_id)
    }

    pub fn contains_card(&self, card_id: &str) -> bool {
        self.cards.iter().any(|c| c.id == card_id)
    }
}

/// A persisted `(personId, columnId)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub person_id: String,
    pub column_id: String,
}

impl Assignment {
    pub fn new(person_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            column_id: column_id.into(),
        }
    }
}

/// Shape of `GET /api/people/board`: column id → person ids, in insertion order.
pub type BoardAssignments = BTreeMap<String, Vec<String>>;

/// Fold persisted rows into the board shape. Row order is kept within each column.
pub fn group_assignments(rows: impl IntoIterator<Item = Assignment>) -> BoardAssignments {
    let mut board = BoardAssignments::new();
    for row in rows {
        board.entry(row.column_id).or_default().push(row.person_id);
    }
    board
}
