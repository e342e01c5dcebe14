//! Student roster endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::http::{ApiError, AppState};
use crate::results::ProjectedRecord;
use crate::statement::Operation;

/// GET /list
async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let list = state.read(Operation::StudentList, query).await?;
    Ok(Json(json!({ "result": "success", "list": list })))
}

/// GET /search?stuNo=
///
/// Answers with the bare array of matching rows.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ProjectedRecord>>, ApiError> {
    Ok(Json(state.read(Operation::StudentSearch, query).await?))
}

/// GET /insert?stuNo=&name=&dept=
async fn insert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    state.write(Operation::StudentInsert, query).await?;
    Ok(Json(json!({ "result": "success" })))
}

/// GET /update?stuNo=&name=&dept=
async fn update(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    state.write(Operation::StudentUpdate, query).await?;
    Ok(Json(json!({ "result": "success" })))
}

/// GET /delete?stuNo=
async fn delete(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    state.write(Operation::StudentDelete, query).await?;
    Ok(Json(json!({ "result": "success" })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(list))
        .route("/search", get(search))
        .route("/insert", get(insert))
        .route("/update", get(update))
        .route("/delete", get(delete))
}
