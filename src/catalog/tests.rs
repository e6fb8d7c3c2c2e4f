//! Catalog Module Tests
//!
//! ## Test Scopes
//! - **Trigram**: pg_trgm-compatible trigram sets and similarity.
//! - **Ranking**: Exact > prefix > fuzzy, and field weight ordering.
//! - **Memory store**: Uniqueness rules, filtering, paging, grouping, suggestions.
//! - **SQL assembly**: LIKE escaping and bind placement in generated statements.

#[cfg(test)]
mod tests {
    use crate::catalog::fixtures::{day, record, sample_catalog};
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::postgres::{COLUMNS, escape_like, push_filter, push_relevance};
    use crate::catalog::ranking::{RankingWeights, field_points, relevance};
    use crate::catalog::store::CatalogStore;
    use crate::catalog::trigram::{similarity, trigrams};
    use crate::catalog::types::*;

    use sqlx::{Postgres, QueryBuilder};

    fn ids(rows: &[Presentation]) -> Vec<i32> {
        rows.iter().map(|r| r.id).collect()
    }

    // ============================================================
    // TRIGRAM TESTS
    // ============================================================

    #[test]
    fn test_trigrams_padding() {
        let set = trigrams("Cat");

        assert_eq!(set.len(), 4);
        for t in ["  c", " ca", "cat", "at "] {
            assert!(set.contains(t), "missing {t:?}");
        }
    }

    #[test]
    fn test_trigrams_split_on_punctuation() {
        let set = trigrams("pre-k");

        assert!(set.contains(" pr"));
        assert!(set.contains("  k"));
        assert!(!set.iter().any(|t| t.contains('-')));
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("algebra", "Algebra"), 1.0);
        assert_eq!(similarity("algebra", "xyz"), 0.0);
        assert_eq!(similarity("", "algebra"), 0.0);

        let close = similarity("algebra", "algebr");
        assert!(close > 0.5 && close < 1.0, "got {close}");
    }

    // ============================================================
    // RANKING TESTS
    // ============================================================

    #[test]
    fn test_field_points_exact_prefix_fuzzy() {
        let w = RankingWeights::default();

        let exact = field_points("Algebra", "algebra", &w);
        let prefix = field_points("Algebra Basics", "algebra", &w);
        let fuzzy = field_points("Pre-Algebra", "algebra", &w);
        let none = field_points("", "algebra", &w);

        assert!(exact > prefix);
        assert!(prefix > fuzzy);
        assert!(fuzzy > 0.0);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn test_field_weight_order() {
        let w = RankingWeights::default();
        let weights: Vec<f64> = TextField::ALL.iter().map(|f| w.field(*f)).collect();

        // subject > topic > sub_topic > name > grade
        assert!(weights.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_subject_match_outranks_name_match() {
        let w = RankingWeights::default();
        let by_subject = record(1, "Intro", "Geometry", "", None);
        let by_name = record(2, "Geometry", "Math", "", None);

        assert!(relevance(&by_subject, "geometry", &w) > relevance(&by_name, "geometry", &w));
    }

    // ============================================================
    // MEMORY STORE TESTS - uniqueness
    // ============================================================

    #[test]
    fn test_insert_rejects_duplicate_slug() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(1, "A", "Math", "", None)).unwrap();

        let mut clash = record(2, "B", "Math", "", None);
        clash.slug = "presentation-1".to_string();

        assert!(catalog.insert(clash).is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_insert_rejects_slug_change() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(1, "A", "Math", "", None)).unwrap();

        let mut renamed = record(1, "A", "Math", "", None);
        renamed.slug = "something-else".to_string();

        assert!(catalog.insert(renamed).is_err());
    }

    #[test]
    fn test_insert_replaces_same_identity() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(1, "Old", "Math", "", None)).unwrap();
        catalog.insert(record(1, "New", "Math", "", None)).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).map(|r| r.name), Some("New".to_string()));
    }

    #[test]
    fn test_concurrent_inserts_claim_slug_once() {
        let catalog = MemoryCatalog::new();

        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=16)
                .map(|id| {
                    let catalog = &catalog;
                    scope.spawn(move || {
                        let mut r = record(id, "Clash", "Math", "", None);
                        r.slug = "shared-slug".to_string();
                        catalog.insert(r).is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 1);
        assert_eq!(catalog.len(), 1);
    }

    // ============================================================
    // MEMORY STORE TESTS - reads
    // ============================================================

    #[tokio::test]
    async fn test_filter_uses_match_keys() {
        let catalog = sample_catalog();
        let filter = CatalogFilter {
            subjects: vec!["english".to_string()],
            ..Default::default()
        };

        // "  english  " and "English" both match
        assert_eq!(catalog.count(&filter).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_text_filter_is_case_insensitive_substring() {
        let catalog = sample_catalog();
        let filter = CatalogFilter {
            subjects: vec!["math".to_string()],
            text: Some("ALGEBRA".to_string()),
            ..Default::default()
        };

        assert_eq!(catalog.count(&filter).await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_page_by_id_is_disjoint_and_ordered() {
        let catalog = sample_catalog();
        let filter = CatalogFilter::default();

        let first = catalog.page(&filter, &PageOrder::IdAscending, 12, 0).await.unwrap();
        let second = catalog.page(&filter, &PageOrder::IdAscending, 12, 12).await.unwrap();

        let mut expected: Vec<i32> = (1..=15).chain(101..=115).collect();
        expected.truncate(24);
        let got: Vec<i32> = ids(&first).into_iter().chain(ids(&second)).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_relevance_order_then_newest_then_id() {
        let catalog = MemoryCatalog::new();
        let mut old = record(1, "Fractions", "Math", "", None);
        old.created_at = day(1);
        let mut new = record(2, "Fractions", "Math", "", None);
        new.created_at = day(5);
        let undated = record(3, "Fractions", "Math", "", None);
        let best = record(4, "Intro", "Fractions", "", None);
        for r in [old, new, undated, best] {
            catalog.insert(r).unwrap();
        }

        let order = PageOrder::Relevance {
            query: "fractions".to_string(),
            weights: RankingWeights::default(),
        };
        let rows = catalog.page(&CatalogFilter::default(), &order, 10, 0).await.unwrap();

        assert_eq!(ids(&rows), vec![4, 2, 1, 3]);
    }

    #[tokio::test]
    async fn test_relevance_requires_trigram() {
        let catalog = sample_catalog().with_trigram(false);
        let order = PageOrder::Relevance {
            query: "algebra".to_string(),
            weights: RankingWeights::default(),
        };

        assert!(!catalog.supports_trigram().await.unwrap());
        assert!(catalog.page(&CatalogFilter::default(), &order, 10, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_facet_counts_skip_blanks() {
        let catalog = sample_catalog();

        let rows = catalog
            .facet_counts(FacetDimension::Topic, &CatalogFilter::default(), None)
            .await
            .unwrap();

        assert!(rows.iter().all(|r| !r.value.trim().is_empty()));
        let algebra = rows.iter().find(|r| r.value == "Algebra Basics");
        assert_eq!(algebra.map(|r| r.count), Some(15));
    }

    #[tokio::test]
    async fn test_facet_counts_scoped_and_contains() {
        let catalog = sample_catalog();
        let filter = CatalogFilter {
            subjects: vec!["science".to_string()],
            ..Default::default()
        };

        let rows = catalog
            .facet_counts(FacetDimension::SubTopic, &filter, Some("CEL"))
            .await
            .unwrap();
        assert_eq!(rows, vec![RawFacetCount { value: "Cells".to_string(), count: 15 }]);

        let none = catalog
            .facet_counts(FacetDimension::SubTopic, &filter, Some("linear"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_searches_content_in_id_order() {
        let catalog = sample_catalog();
        let mut r = record(300, "Mystery", "Art", "", None);
        r.presentation_content = Some("<p>Photosynthesis explained</p>".to_string());
        catalog.insert(r).unwrap();

        let hits = catalog.suggest("photosynth", 8).await.unwrap();
        assert_eq!(ids(&hits), vec![300]);

        let many = catalog.suggest("lesson", 8).await.unwrap();
        assert_eq!(ids(&many), (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let catalog = sample_catalog();

        let found = catalog.find_by_slug("presentation-101").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(101));
        assert!(catalog.find_by_slug("missing").await.unwrap().is_none());
    }

    // ============================================================
    // SQL ASSEMBLY TESTS
    // ============================================================

    #[test]
    fn test_created_at_cast_to_timestamptz() {
        assert!(COLUMNS.contains("created_at::timestamptz AS created_at"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_sure\\"), "100\\%\\_sure\\\\");
        assert_eq!(escape_like("algebra"), "algebra");
    }

    #[test]
    fn test_filter_sql_binds_values() {
        let filter = CatalogFilter {
            subjects: vec!["math".to_string()],
            grades: vec!["first grade".to_string(), "1st grade".to_string()],
            text: Some("alg".to_string()),
            ..Default::default()
        };

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE TRUE");
        push_filter(&mut qb, &filter);
        let sql = qb.sql();

        assert!(sql.contains("coalesce(subject, '')"));
        assert!(sql.contains("= ANY($1)"));
        assert!(sql.contains("= ANY($2)"));
        assert!(sql.contains("name, '') ILIKE $"));
        assert!(!sql.contains("alg"));
        assert!(!sql.contains("topic, ''), '\\s+'"));
    }

    #[test]
    fn test_relevance_sql_uses_similarity() {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT ");
        push_relevance(&mut qb, "Algebra", &RankingWeights::default());
        let sql = qb.sql();

        assert_eq!(sql.matches("similarity(").count(), TextField::ALL.len());
        assert!(sql.starts_with("SELECT (5.0000 * (CASE WHEN"));
        assert!(!sql.to_lowercase().contains("'algebra'"));
    }
}
