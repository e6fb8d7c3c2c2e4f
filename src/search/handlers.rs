use super::engine::{detail, search, suggest};
use super::params::parse_query;
use super::types::{SearchRequest, SearchResponse, SuggestResponse};
use crate::state::AppState;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
}

pub async fn handle_search_post(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<SearchResponse>) {
    let request = SearchRequest::from_json_body(&body);
    run_search(&state, request).await
}

pub async fn handle_search_get(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<SearchResponse>) {
    let request = SearchRequest::from_query_pairs(&parse_query(query.as_deref()));
    run_search(&state, request).await
}

async fn run_search(state: &AppState, request: SearchRequest) -> (StatusCode, Json<SearchResponse>) {
    match search(&request, state.catalog.as_ref(), state.text_search.as_ref()).await {
        Ok(response) => {
            tracing::debug!(
                "Search returned {} of {} items",
                response.items.len(),
                response.total
            );
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            tracing::error!("Search failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::default()),
            )
        }
    }
}

pub async fn handle_suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestResponse> {
    let q = params.q.unwrap_or_default();
    match suggest(&q, state.catalog.as_ref()).await {
        Ok(items) => Json(SuggestResponse { items }),
        Err(e) => {
            tracing::warn!("Suggest failed for '{}': {:#}", q, e);
            Json(SuggestResponse::default())
        }
    }
}

pub async fn handle_get_presentation(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match detail(&slug, state.catalog.as_ref()).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => {
            tracing::debug!("No presentation with slug '{}'", slug);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        Err(e) => {
            tracing::error!("Lookup of '{}' failed: {:#}", slug, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
