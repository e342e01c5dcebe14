//! User account endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::http::{ApiError, AppState};
use crate::statement::Operation;

/// GET /user/list
async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let list = state.read(Operation::UserList, query).await?;
    Ok(Json(json!({ "result": "success", "list": list })))
}

/// GET /user/login?userId=&pwd=
///
/// Wrong credentials are a normal answer, not an error.
async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .read(Operation::UserLogin, query)
        .await?
        .into_iter()
        .next();
    Ok(Json(match user {
        Some(user) => json!({ "result": "success", "user": user }),
        None => json!({ "result": "fail" }),
    }))
}

async fn join(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    state.write(Operation::UserJoin, query).await?;
    Ok(Json(json!({ "result": "success" })))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    state.write(Operation::UserUpdate, query).await?;
    Ok(Json(json!({ "result": "success" })))
}

async fn delete(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    state.write(Operation::UserDelete, query).await?;
    Ok(Json(json!({ "result": "success" })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/list", get(list))
        .route("/user/login", get(login))
        .route("/user/join", get(join))
        .route("/user/update", get(update))
        .route("/user/delete", get(delete))
}
