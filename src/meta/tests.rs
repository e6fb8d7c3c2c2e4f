//! Meta Endpoint Tests
//!
//! Facet listings through the real router: normalization, ordering, scoping and degradation.

#[cfg(test)]
mod tests {
    use crate::catalog::fixtures::{FailingCatalog, sample_catalog};
    use crate::catalog::store::CatalogStore;
    use crate::meta::handlers::FiltersResponse;
    use crate::routes::router;
    use crate::search::text::SubstringTextSearch;
    use crate::search::types::FacetCount;
    use crate::state::AppState;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get_json<T: serde::de::DeserializeOwned>(
        store: Arc<dyn CatalogStore>,
        uri: &str,
    ) -> (StatusCode, T) {
        let app = router(AppState::new(store, Arc::new(SubstringTextSearch)));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn names(list: &[FacetCount]) -> Vec<&str> {
        list.iter().map(|f| f.name.as_str()).collect()
    }

    // ============================================================
    // SUBJECTS & GRADES
    // ============================================================

    #[tokio::test]
    async fn test_subjects_normalized_and_merged() {
        let (status, list): (_, Vec<FacetCount>) =
            get_json(Arc::new(sample_catalog()), "/api/meta/subjects").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&list), vec!["English", "Math", "Science"]);
        assert_eq!(list[0].count, 2);
        assert!(list.iter().all(|f| !f.name.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_grades_in_pedagogical_order() {
        let (_, list): (_, Vec<FacetCount>) =
            get_json(Arc::new(sample_catalog()), "/api/meta/grades").await;

        assert_eq!(
            names(&list),
            vec![
                "Kindergarten",
                "First Grade",
                "Second Grade",
                "High School",
                "Kingdergardon"
            ]
        );
        assert_eq!(list[1].count, 7);
        assert_eq!(list[2].count, 8);
    }

    #[tokio::test]
    async fn test_filters_combines_subjects_and_grades() {
        let (status, filters): (_, FiltersResponse) =
            get_json(Arc::new(sample_catalog()), "/api/meta/filters").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(filters.subjects.len(), 3);
        assert_eq!(filters.grades[0].name, "Kindergarten");
    }

    // ============================================================
    // TOPICS & SUB-TOPICS
    // ============================================================

    #[tokio::test]
    async fn test_topics_unscoped() {
        let (_, list): (_, Vec<FacetCount>) =
            get_json(Arc::new(sample_catalog()), "/api/meta/topics").await;

        assert_eq!(names(&list), vec!["Algebra Basics", "Biology", "Spelling"]);
    }

    #[tokio::test]
    async fn test_topics_scoped_by_subject_and_text() {
        let store: Arc<dyn CatalogStore> = Arc::new(sample_catalog());

        let (_, list): (_, Vec<FacetCount>) =
            get_json(store.clone(), "/api/meta/topics?subjects=science").await;
        assert_eq!(names(&list), vec!["Biology"]);

        let (_, list): (_, Vec<FacetCount>) =
            get_json(store.clone(), "/api/meta/topics?q=ALG").await;
        assert_eq!(names(&list), vec!["Algebra Basics"]);

        let (_, list): (_, Vec<FacetCount>) =
            get_json(store, "/api/meta/topics?grades=First%20Grade").await;
        assert_eq!(list, vec![FacetCount { name: "Algebra Basics".to_string(), count: 7 }]);
    }

    #[tokio::test]
    async fn test_subtopics_scoped_by_topic() {
        let (_, list): (_, Vec<FacetCount>) = get_json(
            Arc::new(sample_catalog()),
            "/api/meta/subtopics?topics[]=algebra%20basics&topics[]=Spelling",
        )
        .await;

        assert_eq!(names(&list), vec!["Linear Equations"]);
        assert_eq!(list[0].count, 15);
    }

    #[tokio::test]
    async fn test_limit_caps_list() {
        let (_, list): (_, Vec<FacetCount>) =
            get_json(Arc::new(sample_catalog()), "/api/meta/topics?limit=2").await;
        assert_eq!(names(&list), vec!["Algebra Basics", "Biology"]);

        let (_, list): (_, Vec<FacetCount>) =
            get_json(Arc::new(sample_catalog()), "/api/meta/topics?limit=0").await;
        assert_eq!(list.len(), 1);
    }

    // ============================================================
    // DEGRADATION
    // ============================================================

    #[tokio::test]
    async fn test_failures_degrade_to_empty_lists() {
        for uri in [
            "/api/meta/subjects",
            "/api/meta/grades",
            "/api/meta/topics?q=x",
            "/api/meta/subtopics",
        ] {
            let (status, list): (_, Vec<FacetCount>) = get_json(Arc::new(FailingCatalog), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(list.is_empty(), "{uri}");
        }

        let (status, filters): (_, FiltersResponse) =
            get_json(Arc::new(FailingCatalog), "/api/meta/filters").await;
        assert_eq!(status, StatusCode::OK);
        assert!(filters.subjects.is_empty() && filters.grades.is_empty());
    }
}
