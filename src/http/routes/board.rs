//! Bulletin board endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::http::{ApiError, AppState};
use crate::statement::{Fields, Operation};

/// GET /board/list[?option=&keyWord=]
///
/// A non-blank `keyWord` turns the listing into a search on the column named by `option`.
async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let fields = Fields::from(query);
    let searching = fields
        .text("keyWord")
        .is_some_and(|k| !k.trim().is_empty());
    let operation = if searching {
        Operation::BoardSearch
    } else {
        Operation::BoardList
    };
    let list = state.read_fields(operation, &fields).await?;
    Ok(Json(json!({ "result": "success", "list": list })))
}

/// GET /board/view?boardNo=
///
/// Counts the view, then returns the post. The hit commits on its own, so a missing post
/// still costs one write and a failed read leaves `CNT` bumped.
async fn view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let fields = Fields::from(query);
    let board_no = fields.text("boardNo").unwrap_or_default().to_string();

    let hit = Operation::BoardHit
        .build(&fields)
        .map_err(|e| state.reject(e))?;
    state
        .gateway
        .apply(&hit)
        .await
        .map_err(|e| state.reject(e))?;

    let info = state
        .read_fields(Operation::BoardView, &fields)
        .await?
        .into_iter()
        .next()
        .ok_or(ApiError::NotFound {
            resource: "board",
            id: board_no,
        })?;
    Ok(Json(json!({ "result": "success", "info": info })))
}

/// GET /board/insert?title=&userId=&contents=&kind=
async fn insert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let affected = state.write(Operation::BoardInsert, query).await?;
    Ok(Json(json!({ "result": "success", "affected": affected })))
}

/// GET /board/update?boardNo=&title=&contents=&kind=
async fn update(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let affected = state.write(Operation::BoardUpdate, query).await?;
    Ok(Json(json!({ "result": "success", "affected": affected })))
}

/// GET /board/delete?boardNo=
async fn delete(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let affected = state.write(Operation::BoardDelete, query).await?;
    Ok(Json(json!({ "result": "success", "affected": affected })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/board/list", get(list))
        .route("/board/view", get(view))
        .route("/board/insert", get(insert))
        .route("/board/update", get(update))
        .route("/board/delete", get(delete))
}
