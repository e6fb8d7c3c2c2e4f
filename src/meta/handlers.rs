use crate::catalog::types::FacetDimension;
use crate::search::facets::{FacetQuery, facet_counts};
use crate::search::params::{QueryPairs, coerce_facet_limit, parse_query, read_list, read_value};
use crate::search::types::{FacetCount, FacetSelection};
use crate::state::AppState;

use axum::Json;
use axum::extract::{RawQuery, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub subjects: Vec<FacetCount>,
    pub grades: Vec<FacetCount>,
}

pub async fn handle_filters(State(state): State<Arc<AppState>>) -> Json<FiltersResponse> {
    let subject = FacetQuery::unscoped(FacetDimension::Subject);
    let grade = FacetQuery::unscoped(FacetDimension::Grade);

    let (subjects, grades) = tokio::join!(
        facet_counts(state.catalog.as_ref(), &subject),
        facet_counts(state.catalog.as_ref(), &grade),
    );

    Json(FiltersResponse { subjects, grades })
}

pub async fn handle_subjects(State(state): State<Arc<AppState>>) -> Json<Vec<FacetCount>> {
    let query = FacetQuery::unscoped(FacetDimension::Subject);
    Json(facet_counts(state.catalog.as_ref(), &query).await)
}

pub async fn handle_grades(State(state): State<Arc<AppState>>) -> Json<Vec<FacetCount>> {
    let query = FacetQuery::unscoped(FacetDimension::Grade);
    Json(facet_counts(state.catalog.as_ref(), &query).await)
}

/// `GET /api/meta/topics?q=&subjects=&grades=&limit=`
pub async fn handle_topics(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Json<Vec<FacetCount>> {
    let pairs = parse_query(query.as_deref());
    let query = scoped_query(FacetDimension::Topic, &pairs, false);
    Json(facet_counts(state.catalog.as_ref(), &query).await)
}

/// `GET /api/meta/subtopics?q=&topics=&subjects=&grades=&limit=`
pub async fn handle_subtopics(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Json<Vec<FacetCount>> {
    let pairs = parse_query(query.as_deref());
    let query = scoped_query(FacetDimension::SubTopic, &pairs, true);
    Json(facet_counts(state.catalog.as_ref(), &query).await)
}

fn scoped_query(dimension: FacetDimension, pairs: &QueryPairs, with_topics: bool) -> FacetQuery {
    let contains = read_value(pairs, "q")
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    FacetQuery {
        dimension,
        selection: FacetSelection {
            subjects: read_list(pairs, "subjects"),
            grades: read_list(pairs, "grades"),
            topics: if with_topics {
                read_list(pairs, "topics")
            } else {
                Vec::new()
            },
            sub_topics: Vec::new(),
        },
        contains,
        limit: coerce_facet_limit(read_value(pairs, "limit")),
    }
}
