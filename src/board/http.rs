//! `reqwest` implementation of the board repositories.

use std::time::Duration;

use async_trait::async_trait;
use board_common::wire::{
    ColumnsPayload, CreateAssignmentRequest, CreatePersonRequest, DeleteAssignmentQuery,
    DeletePersonQuery, ErrorBody, MoveAssignmentRequest,
};
use board_common::{BoardAssignments, Person};
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::debug;

use super::repository::{BoardRepository, PeopleRepository};
use crate::errors::{BoardError, BoardResult};

const COLUMNS_PATH: &str = "/api/kanban-columns";
const BOARD_PATH: &str = "/api/people/board";
const PEOPLE_PATH: &str = "/api/people";

/// Talks to the board's REST surface.
#[derive(Clone)]
pub struct HttpBoardClient {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpBoardClient {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> BoardResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BoardError::Config(format!(
                "base URL '{}' must start with http:// or https://",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BoardError::Transport)?;
        Ok(Self {
            base_url,
            client,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> BoardResult<Response> {
        let response = self.authorize(builder).send().await?;
        check_status(response).await
    }
}

/// Map non-2xx responses to `BoardError`, preferring the server's
/// `{"error": ...}` message over the raw body.
async fn check_status(response: Response) -> BoardResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            }
        });
    debug!(status = status.as_u16(), %message, "request rejected");
    if status == StatusCode::UNAUTHORIZED {
        Err(BoardError::Unauthorized(message))
    } else {
        Err(BoardError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BoardRepository for HttpBoardClient {
    async fn fetch_column_titles(&self) -> BoardResult<Vec<String>> {
        let response = self.send(self.client.get(self.url(COLUMNS_PATH))).await?;
        let payload: ColumnsPayload = response.json().await?;
        Ok(payload.columns)
    }

    async fn save_column_titles(&self, titles: &[String]) -> BoardResult<()> {
        let payload = ColumnsPayload {
            columns: titles.to_vec(),
        };
        self.send(self.client.put(self.url(COLUMNS_PATH)).json(&payload))
            .await?;
        Ok(())
    }

    async fn fetch_assignments(&self) -> BoardResult<BoardAssignments> {
        let response = self.send(self.client.get(self.url(BOARD_PATH))).await?;
        Ok(response.json().await?)
    }

    async fn create_assignment(&self, person_id: &str, column_id: &str) -> BoardResult<()> {
        let body = CreateAssignmentRequest {
            person_id: person_id.to_string(),
            column_id: column_id.to_string(),
        };
        self.send(self.client.post(self.url(BOARD_PATH)).json(&body))
            .await?;
        Ok(())
    }

    async fn move_assignment(
        &self,
        person_id: &str,
        old_column_id: &str,
        new_column_id: &str,
    ) -> BoardResult<()> {
        let body = MoveAssignmentRequest {
            person_id: person_id.to_string(),
            old_column_id: old_column_id.to_string(),
            new_column_id: new_column_id.to_string(),
        };
        self.send(self.client.put(self.url(BOARD_PATH)).json(&body))
            .await?;
        Ok(())
    }

    async fn delete_assignment(&self, person_id: &str, column_id: &str) -> BoardResult<()> {
        let query = DeleteAssignmentQuery {
            person_id: person_id.to_string(),
            column_id: column_id.to_string(),
        };
        self.send(self.client.delete(self.url(BOARD_PATH)).query(&query))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PeopleRepository for HttpBoardClient {
    async fn list_people(&self) -> BoardResult<Vec<Person>> {
        let response = self.send(self.client.get(self.url(PEOPLE_PATH))).await?;
        Ok(response.json().await?)
    }

    async fn create_person(&self, request: &CreatePersonRequest) -> BoardResult<Person> {
        let response = self
            .send(self.client.post(self.url(PEOPLE_PATH)).json(request))
            .await?;
        Ok(response.json().await?)
    }

    async fn delete_person(&self, person_id: &str) -> BoardResult<()> {
        let query = DeletePersonQuery {
            id: person_id.to_string(),
        };
        self.send(self.client.delete(self.url(PEOPLE_PATH)).query(&query))
            .await?;
        Ok(())
    }
}
