use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use board_common::wire::{
    ColumnsPayload, CreateAssignmentRequest, CreatePersonRequest, DeleteAssignmentQuery,
    DeletePersonQuery, MoveAssignmentRequest,
};
use board_common::{BoardAssignments, Person};
use tracing::{error, info};

use super::db::DbHandle;
#[cfg(test)]
use super::db::BoardDb;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub db: DbHandle,
    pub auth_token: Option<String>,
}

pub type SharedState = Arc<AppState>;

// ── Error handling ────────────────────────────────────────────────────

pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                error!(error = %format!("{:#}", err), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Reject blank values with the fixed `"<field> is required"` message.
fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::BadRequest(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

// ── Auth ──────────────────────────────────────────────────────────────

/// Passes when no token is configured or the request carries
/// `Authorization: Bearer <token>`.
pub struct Authorized;

impl FromRequestParts<SharedState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.auth_token.as_deref() else {
            return Ok(Authorized);
        };
        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        if provided == Some(expected) {
            Ok(Authorized)
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/kanban-columns",
            get(get_columns).put(put_columns),
        )
        .route(
            "/api/people/board",
            get(get_assignments)
                .post(create_assignment)
                .put(move_assignment)
                .delete(delete_assignment),
        )
        .route(
            "/api/people",
            get(list_people).post(create_person).delete(delete_person),
        )
        .route("/health", get(health_check))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn get_columns(
    _auth: Authorized,
    State(state): State<SharedState>,
) -> Result<Json<ColumnsPayload>, ApiError> {
    let columns = state.db.call(|db| db.get_column_titles()).await?;
    Ok(Json(ColumnsPayload { columns }))
}

async fn put_columns(
    _auth: Authorized,
    State(state): State<SharedState>,
    payload: Result<Json<ColumnsPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    for title in &payload.columns {
        require("column title", title)?;
    }
    let count = payload.columns.len();
    state
        .db
        .call(move |db| db.replace_column_titles(&payload.columns))
        .await?;
    info!(columns = count, "column titles saved");
    Ok(StatusCode::OK)
}

async fn get_assignments(
    _auth: Authorized,
    State(state): State<SharedState>,
) -> Result<Json<BoardAssignments>, ApiError> {
    let board = state.db.call(|db| db.get_assignments()).await?;
    Ok(Json(board))
}

async fn create_assignment(
    _auth: Authorized,
    State(state): State<SharedState>,
    payload: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    require("personId", &req.person_id)?;
    require("columnId", &req.column_id)?;

    let (person_id, column_id) = (req.person_id.clone(), req.column_id.clone());
    let created = state
        .db
        .call(move |db| {
            if db.get_person(&person_id)?.is_none() {
                return Ok(None);
            }
            db.create_assignment(&person_id, &column_id).map(Some)
        })
        .await?;
    match created {
        None => Err(ApiError::NotFound(format!(
            "Person {} not found",
            req.person_id
        ))),
        Some(inserted) => {
            info!(
                person_id = %req.person_id,
                column_id = %req.column_id,
                inserted,
                "assignment created"
            );
            Ok(StatusCode::OK)
        }
    }
}

async fn move_assignment(
    _auth: Authorized,
    State(state): State<SharedState>,
    payload: Result<Json<MoveAssignmentRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    require("personId", &req.person_id)?;
    require("oldColumnId", &req.old_column_id)?;
    require("newColumnId", &req.new_column_id)?;

    let moved_req = req.clone();
    let result = state
        .db
        .call(move |db| {
            if db.get_person(&moved_req.person_id)?.is_none() {
                return Ok(None);
            }
            db.move_assignment(
                &moved_req.person_id,
                &moved_req.old_column_id,
                &moved_req.new_column_id,
            )
            .map(Some)
        })
        .await?;
    match result {
        None => Err(ApiError::NotFound(format!(
            "Person {} not found",
            req.person_id
        ))),
        Some(result) => {
            info!(
                person_id = %req.person_id,
                from = %req.old_column_id,
                to = %req.new_column_id,
                ?result,
                "assignment moved"
            );
            Ok(StatusCode::OK)
        }
    }
}

async fn delete_assignment(
    _auth: Authorized,
    State(state): State<SharedState>,
    query: Result<Query<DeleteAssignmentQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query?;
    require("personId", &query.person_id)?;
    require("columnId", &query.column_id)?;

    let (person_id, column_id) = (query.person_id.clone(), query.column_id.clone());
    let removed = state
        .db
        .call(move |db| db.delete_assignment(&person_id, &column_id))
        .await?;
    info!(
        person_id = %query.person_id,
        column_id = %query.column_id,
        removed,
        "assignment deleted"
    );
    Ok(StatusCode::OK)
}

async fn list_people(
    _auth: Authorized,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let people = state.db.call(|db| db.list_people()).await?;
    Ok(Json(people))
}

async fn create_person(
    _auth: Authorized,
    State(state): State<SharedState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let Json(req) = payload?;
    require("name", &req.name)?;

    let id = uuid::Uuid::new_v4().to_string();
    let person = state
        .db
        .call(move |db| db.create_person(&id, &req))
        .await?;
    info!(person_id = %person.id, name = %person.name, "person created");
    Ok((StatusCode::CREATED, Json(person)))
}

async fn delete_person(
    _auth: Authorized,
    State(state): State<SharedState>,
    query: Result<Query<DeletePersonQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query?;
    require("id", &query.id)?;

    let id = query.id.clone();
    let deleted = state.db.call(move |db| db.delete_person(&id)).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Person {} not found", query.id)));
    }
    info!(person_id = %query.id, "person deleted");
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app_with(auth_token: Option<&str>) -> Router {
        let db = BoardDb::new_in_memory().unwrap();
        let state = Arc::new(AppState {
            db: DbHandle::new(db),
            auth_token: auth_token.map(str::to_string),
        });
        api_router().with_state(state)
    }

    fn test_app() -> Router {
        test_app_with(None)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_test_person(app: &Router, name: &str) -> Person {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/people",
                serde_json::json!({"name": name}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response.into_body()).await
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_columns_put_then_get() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/kanban-columns",
                serde_json::json!({"columns": ["Leads", "Closed"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/api/kanban-columns"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload: ColumnsPayload = body_json(response.into_body()).await;
        assert_eq!(payload.columns, vec!["Leads", "Closed"]);
    }

    #[tokio::test]
    async fn test_put_columns_rejects_malformed_body() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/kanban-columns",
                serde_json::json!({"titles": ["Leads"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_columns_rejects_blank_title() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/kanban-columns",
                serde_json::json!({"columns": ["Leads", "  "]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], "column title is required");
    }

    #[tokio::test]
    async fn test_create_assignment_and_read_board() {
        let app = test_app();
        let ada = create_test_person(&app, "Ada").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": ada.id, "columnId": "leads"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Posting the same pair again is accepted and changes nothing.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": ada.id, "columnId": "leads"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/api/people/board"))
            .await
            .unwrap();
        let board: BoardAssignments = body_json(response.into_body()).await;
        assert_eq!(board.len(), 1);
        assert_eq!(board["leads"], vec![ada.id]);
    }

    #[tokio::test]
    async fn test_create_assignment_missing_field() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"columnId": "leads"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], "personId is required");
    }

    #[tokio::test]
    async fn test_create_assignment_unknown_person() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": "ghost", "columnId": "leads"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_move_assignment() {
        let app = test_app();
        let ada = create_test_person(&app, "Ada").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": ada.id, "columnId": "leads"}),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/people/board",
                serde_json::json!({
                    "personId": ada.id,
                    "oldColumnId": "leads",
                    "newColumnId": "closed"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/api/people/board"))
            .await
            .unwrap();
        let board: BoardAssignments = body_json(response.into_body()).await;
        assert!(!board.contains_key("leads"));
        assert_eq!(board["closed"], vec![ada.id]);
    }

    #[tokio::test]
    async fn test_same_column_move_keeps_assignment() {
        let app = test_app();
        let ada = create_test_person(&app, "Ada").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": ada.id, "columnId": "leads"}),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/people/board",
                serde_json::json!({
                    "personId": ada.id,
                    "oldColumnId": "leads",
                    "newColumnId": "leads"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/api/people/board"))
            .await
            .unwrap();
        let board: BoardAssignments = body_json(response.into_body()).await;
        assert_eq!(board["leads"], vec![ada.id]);
    }

    #[tokio::test]
    async fn test_move_assignment_requires_new_column() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/people/board",
                serde_json::json!({"personId": "p1", "oldColumnId": "leads"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], "newColumnId is required");
    }

    #[tokio::test]
    async fn test_delete_assignment_via_query() {
        let app = test_app();
        let ada = create_test_person(&app, "Ada").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": ada.id, "columnId": "leads"}),
            ))
            .await
            .unwrap();

        let uri = format!("/api/people/board?personId={}&columnId=leads", ada.id);
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/api/people/board"))
            .await
            .unwrap();
        let board: BoardAssignments = body_json(response.into_body()).await;
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_delete_assignment_missing_column() {
        let app = test_app();
        let response = app
            .oneshot(empty_request("DELETE", "/api/people/board?personId=p1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_person_requires_name() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/people",
                serde_json::json!({"email": "ada@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn test_delete_person_cleans_assignments() {
        let app = test_app();
        let ada = create_test_person(&app, "Ada").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/people/board",
                serde_json::json!({"personId": ada.id, "columnId": "leads"}),
            ))
            .await
            .unwrap();

        let uri = format!("/api/people?id={}", ada.id);
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/people/board"))
            .await
            .unwrap();
        let board: BoardAssignments = body_json(response.into_body()).await;
        assert!(board.is_empty());

        let response = app
            .oneshot(empty_request("GET", "/api/people"))
            .await
            .unwrap();
        let people: Vec<Person> = body_json(response.into_body()).await;
        assert!(people.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_required_when_configured() {
        let app = test_app_with(Some("s3cret"));

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/kanban-columns"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("GET")
            .uri("/api/kanban-columns")
            .header("authorization", "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("GET")
            .uri("/api/kanban-columns")
            .header("authorization", "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Health stays open.
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
