//! JSON API handlers.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use mdocs_protocol::{DocumentContent, DocumentDescriptor};
use serde::Deserialize;

use super::error::ApiError;
use super::SharedState;

/// Query parameters of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive filter on title or filename.
    pub q: Option<String>,
}

/// `GET /api/docs`
pub async fn list_docs(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DocumentDescriptor>>, ApiError> {
    let mut docs = state.store.list().await.map_err(ApiError::from_list)?;

    if let Some(q) = query.q.as_deref() {
        docs.retain(|doc| doc.matches(q));
    }

    Ok(Json(docs))
}

/// `GET /api/docs/{filename}`
///
/// A segment that does not decode to UTF-8 is an invalid name like any
/// other, answered with the JSON error body.
pub async fn get_doc(
    State(state): State<SharedState>,
    filename: Result<Path<String>, PathRejection>,
) -> Result<Json<DocumentContent>, ApiError> {
    let Path(filename) = filename.map_err(|rejection| {
        tracing::warn!("Rejected document path: {}", rejection.body_text());
        ApiError::InvalidName
    })?;

    let doc = state
        .store
        .load(&filename)
        .await
        .map_err(ApiError::from_load)?;

    Ok(Json(doc))
}
