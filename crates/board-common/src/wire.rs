//! JSON payloads of the board's REST surface.
//!
//! | Route                         | Body / query                         |
//! |-------------------------------|--------------------------------------|
//! | `GET/PUT /api/kanban-columns` | [`ColumnsPayload`]                   |
//! | `POST /api/people/board`      | [`CreateAssignmentRequest`]          |
//! | `PUT /api/people/board`       | [`MoveAssignmentRequest`]            |
//! | `DELETE /api/people/board`    | [`DeleteAssignmentQuery`] (query)    |
//! | `POST /api/people`            | [`CreatePersonRequest`]              |
//! | `DELETE /api/people`          | [`DeletePersonQuery`] (query)        |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsPayload {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[serde(default)]
    pub person_id: String,
    #[serde(default)]
    pub column_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAssignmentRequest {
    #[serde(default)]
    pub person_id: String,
    #[serde(default)]
    pub old_column_id: String,
    #[serde(default)]
    pub new_column_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssignmentQuery {
    #[serde(default)]
    pub person_id: String,
    #[serde(default)]
    pub column_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePersonQuery {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    #[serde(default)]
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

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
