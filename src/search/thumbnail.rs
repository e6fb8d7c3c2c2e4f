//! Extraction of bare URLs and plain text from stored HTML snippets.

use crate::catalog::types::Presentation;
use crate::search::normalize::collapse_whitespace;
use crate::search::types::SeoMeta;

use regex::Regex;
use std::sync::LazyLock;

static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)src\s*=\s*["']([^"']+)["']"#).expect("static regex"));
static SLIDES_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"presentation/d/([^/?#]+)").expect("static regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

pub const SNIPPET_CHARS: usize = 120;

/// Bare thumbnail URL from either a URL or an `<img ...>` snippet.
pub fn extract_thumbnail(stored: Option<&str>) -> Option<String> {
    let value = stored?.trim();
    if value.is_empty() {
        return None;
    }

    if value.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("<img")) {
        return SRC_ATTR.captures(value).map(|caps| caps[1].to_string());
    }

    Some(value.to_string())
}

/// URL for an embedded viewer.
///
/// Prefers the `src` of an iframe stored in `presentation_view_link` (or the link itself),
/// then a Google Slides embed built from the export link's document id.
pub fn embed_url(record: &Presentation) -> Option<String> {
    if let Some(link) = record
        .presentation_view_link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        return Some(match SRC_ATTR.captures(link) {
            Some(caps) => caps[1].to_string(),
            None => link.to_string(),
        });
    }

    let export = record.slides_export_link_url.as_deref()?;
    SLIDES_ID.captures(export).map(|caps| {
        format!(
            "https://docs.google.com/presentation/d/{}/embed?slide=id.p",
            &caps[1]
        )
    })
}

/// Tag-free, whitespace-collapsed prefix of `html`, at most `max_chars` characters.
pub fn plain_snippet(html: Option<&str>, max_chars: usize) -> String {
    let Some(html) = html else {
        return String::new();
    };
    let text = collapse_whitespace(&TAG.replace_all(html, " "));
    text.chars().take(max_chars).collect()
}

pub fn seo_meta(record: &Presentation) -> SeoMeta {
    let non_empty = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    let title = non_empty(record.meta_titles.as_deref()).unwrap_or_else(|| record.name.clone());
    let description = non_empty(record.meta_description.as_deref()).unwrap_or_else(|| {
        [
            Some(record.subject.as_str()),
            Some(record.grade.as_str()),
            record.topic.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" • ")
    });

    SeoMeta { title, description }
}
