//! PostgreSQL Catalog
//!
//! Reads the `"Presentation"` table through a pooled connection created once at startup.
//! All SQL is assembled with `QueryBuilder` so every user-supplied value is a bind parameter.
//! Relevance ordering relies on `similarity()` from the `pg_trgm` extension; callers are
//! expected to consult [`CatalogStore::supports_trigram`] before asking for it.

use super::ranking::RankingWeights;
use super::store::CatalogStore;
use super::types::*;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use std::time::Duration;

const TABLE: &str = r#""Presentation""#;

/// `created_at` is cast so both `timestamp` and `timestamptz` columns decode as UTC.
pub(super) const COLUMNS: &str = "id, slug, name, \
     coalesce(subject, '') AS subject, coalesce(grade, '') AS grade, \
     topic, sub_topic, thumbnail, thumbnail_alt_text, presentation_content, summary, \
     presentation_view_link, slides_export_link_url, download_ppt_url, download_pdf_url, \
     rating, reviews, meta_description, meta_titles, \
     created_at::timestamptz AS created_at";

pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("connecting to the catalog database")?;

        tracing::info!("Catalog pool ready (max {} connections)", max_connections);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes `%`, `_` and `\` for use inside an `ILIKE ... ESCAPE '\'` pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// SQL twin of `search::normalize::match_key`.
fn match_key_sql(column: &str) -> String {
    format!(r"lower(btrim(regexp_replace(coalesce({column}, ''), '\s+', ' ', 'g')))")
}

pub(super) fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    for dimension in FacetDimension::ALL {
        let keys = filter.keys(dimension);
        if keys.is_empty() {
            continue;
        }
        qb.push(" AND ");
        qb.push(match_key_sql(dimension.column()));
        qb.push(" = ANY(");
        qb.push_bind(keys.to_vec());
        qb.push(")");
    }

    if let Some(text) = filter.text.as_deref().filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(text));
        qb.push(" AND (");
        for (i, field) in TextField::ALL.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(format!("coalesce({}, '') ILIKE ", field.column()));
            qb.push_bind(pattern.clone());
            qb.push(r" ESCAPE '\'");
        }
        qb.push(")");
    }
}

pub(super) fn push_relevance(qb: &mut QueryBuilder<'_, Postgres>, query: &str, weights: &RankingWeights) {
    let query = query.trim().to_lowercase();
    let prefix = format!("{}%", escape_like(&query));

    qb.push("(");
    for (i, field) in TextField::ALL.iter().enumerate() {
        if i > 0 {
            qb.push(" + ");
        }
        let value = format!("lower(btrim(coalesce({}, '')))", field.column());
        qb.push(format!("{:.4} * (CASE WHEN {} = ", weights.field(*field), value));
        qb.push_bind(query.clone());
        qb.push(format!(" THEN {:.4} WHEN {} LIKE ", weights.exact, value));
        qb.push_bind(prefix.clone());
        qb.push(format!(
            r" ESCAPE '\' THEN {:.4} ELSE {:.4} * similarity({}, ",
            weights.prefix, weights.fuzzy, value
        ));
        qb.push_bind(query.clone());
        qb.push(") END)");
    }
    qb.push(")");
}

#[async_trait]
impl CatalogStore for PgCatalog {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn supports_trigram(&self) -> Result<bool> {
        let installed: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = 'pg_trgm')",
        )
        .fetch_one(&self.pool)
        .await
        .context("probing for pg_trgm")?;

        Ok(installed)
    }

    async fn count(&self, filter: &CatalogFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filter(&mut qb, filter);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .context("counting presentations")?;

        Ok(total.max(0) as u64)
    }

    async fn page(
        &self,
        filter: &CatalogFilter,
        order: &PageOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Presentation>> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {TABLE} WHERE TRUE"));
        push_filter(&mut qb, filter);

        match order {
            PageOrder::IdAscending => {
                qb.push(" ORDER BY id ASC");
            }
            PageOrder::Relevance { query, weights } => {
                qb.push(" ORDER BY ");
                push_relevance(&mut qb, query, weights);
                qb.push(" DESC, created_at DESC NULLS LAST, id ASC");
            }
        }

        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(offset as i64);

        qb.build_query_as::<Presentation>()
            .fetch_all(&self.pool)
            .await
            .context("fetching presentation page")
    }

    async fn facet_counts(
        &self,
        dimension: FacetDimension,
        filter: &CatalogFilter,
        contains: Option<&str>,
    ) -> Result<Vec<RawFacetCount>> {
        let column = dimension.column();
        let mut qb = QueryBuilder::new(format!(
            "SELECT {column} AS value, COUNT(*) AS count FROM {TABLE} \
             WHERE {column} IS NOT NULL AND btrim({column}) <> ''"
        ));
        push_filter(&mut qb, filter);

        if let Some(needle) = contains.filter(|n| !n.is_empty()) {
            qb.push(format!(" AND {column} ILIKE "));
            qb.push_bind(format!("%{}%", escape_like(needle)));
            qb.push(r" ESCAPE '\'");
        }
        qb.push(format!(" GROUP BY {column}"));

        qb.build_query_as::<RawFacetCount>()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("grouping presentations by {column}"))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Presentation>> {
        let sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE slug = $1 LIMIT 1");
        sqlx::query_as::<_, Presentation>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("looking up presentation by slug")
    }

    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<Presentation>> {
        let pattern = format!("%{}%", escape_like(query));
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {TABLE} WHERE ("));

        let columns = TextField::ALL
            .iter()
            .map(|f| f.column())
            .chain(std::iter::once("presentation_content"));
        for (i, column) in columns.enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(format!("coalesce({column}, '') ILIKE "));
            qb.push_bind(pattern.clone());
            qb.push(r" ESCAPE '\'");
        }

        qb.push(") ORDER BY id ASC LIMIT ");
        qb.push_bind(i64::from(limit));

        qb.build_query_as::<Presentation>()
            .fetch_all(&self.pool)
            .await
            .context("fetching suggestions")
    }
}
