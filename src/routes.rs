use crate::meta::handlers::*;
use crate::search::handlers::*;
use crate::state::AppState;

use axum::Router;
use axum::http::{Method, header::CONTENT_TYPE};
use axum::routing::get;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/meta/filters", get(handle_filters))
        .route("/api/meta/subjects", get(handle_subjects))
        .route("/api/meta/grades", get(handle_grades))
        .route("/api/meta/topics", get(handle_topics))
        .route("/api/meta/subtopics", get(handle_subtopics))
        .route(
            "/api/presentations/search",
            get(handle_search_get).post(handle_search_post),
        )
        .route("/api/presentations/:slug", get(handle_get_presentation))
        .route("/api/search/suggest", get(handle_suggest))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
