use anyhow::{bail, Context};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use super::completion::CompletionRequest;
use crate::categories::repo_types::CategorySummary;

pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_SUMMARY_CHARS: usize = 100;

/// ASCII-only URL shape check: `http(s)://host.tld` plus an optional plain path.
pub fn is_valid_url(url: &str) -> bool {
    lazy_static! {
        static ref URL_RE: Regex =
            Regex::new(r"^https?://([0-9a-z.-]+)\.([a-z.]{2,6})([/0-9A-Za-z_ .-]*)*/?$").unwrap();
    }
    URL_RE.is_match(url)
}

/// Title, summary and category picked by the model for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorization {
    pub category_id: Uuid,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
struct RawCategorization {
    category: RawCategory,
    summary: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: Uuid,
}

pub fn build_prompt(categories: &[CategorySummary], url: &str) -> anyhow::Result<CompletionRequest> {
    let categories = serde_json::to_string(categories).context("serialize categories")?;
    let system = format!(
        "Decide one category of the inputed URL, create summary about the URL, and add title about the URL\n\n\
         IMPORTANT\nthe category provided is below. You should choose one the most related category from the URL\n{categories}\n\n\
         IMPORTANT\nThe summary must consist of maximal {MAX_SUMMARY_CHARS} characters.\n\n\
         IMPORTANT\nThe title must consist of maximal {MAX_TITLE_CHARS} characters\n\n\
         IMPORTANT\nThe output should be in JSON format with attribute as folows\n\
         url: the inputted url\n\
         category: {{id: choosen category id, name: choosen category name}}\n\
         summary: summary of url content\n\
         title: title of the url"
    );
    Ok(CompletionRequest {
        system,
        user: url.to_string(),
    })
}

/// Parse the model's reply. The chosen category must be one of `categories`.
pub fn parse_categorization(raw: &str, categories: &[CategorySummary]) -> anyhow::Result<Categorization> {
    let parsed: RawCategorization =
        serde_json::from_str(raw).context("completion output is not the expected JSON")?;

    if !categories.iter().any(|c| c.id == parsed.category.id) {
        bail!("completion picked unknown category {}", parsed.category.id);
    }

    Ok(Categorization {
        category_id: parsed.category.id,
        title: truncate_chars(parsed.title.trim(), MAX_TITLE_CHARS),
        summary: truncate_chars(parsed.summary.trim(), MAX_SUMMARY_CHARS),
    })
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<CategorySummary> {
        vec![
            CategorySummary { id: Uuid::new_v4(), name: "Tech".into() },
            CategorySummary { id: Uuid::new_v4(), name: "Food".into() },
        ]
    }

    #[test]
    fn url_shape() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://blog.example.co.uk/posts/rust-2024/"));
        assert!(is_valid_url("https://www.dummylink.com"));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn url_shape_is_ascii_only() {
        assert!(is_valid_url("https://example.com/posts/under_score-1"));
        assert!(!is_valid_url("https://example.com/caf\u{e9}"));
        assert!(!is_valid_url("https://exa\u{0663}mple.com"));
        assert!(!is_valid_url("https://example.com/\u{0663}"));
    }

    #[test]
    fn prompt_lists_categories_and_sends_raw_url() {
        let categories = cats();
        let req = build_prompt(&categories, "https://example.com").unwrap();
        assert_eq!(req.user, "https://example.com");
        assert!(req.system.contains(&categories[0].id.to_string()));
        assert!(req.system.contains(r#""name":"Food""#));
        assert!(req.system.contains("maximal 100 characters"));
        assert!(req.system.contains("{id: choosen category id"));
    }

    #[test]
    fn parses_reply_without_url_field() {
        let categories = cats();
        let raw = format!(
            r#"{{"category":{{"id":"{}","name":"Tech"}},"summary":"s","title":"t"}}"#,
            categories[0].id
        );
        let out = parse_categorization(&raw, &categories).unwrap();
        assert_eq!(out.category_id, categories[0].id);
        assert_eq!(out.title, "t");
        assert_eq!(out.summary, "s");
    }

    #[test]
    fn rejects_malformed_or_incomplete_replies() {
        let categories = cats();
        assert!(parse_categorization("not json", &categories).is_err());
        assert!(parse_categorization(r#"{"summary":"s","title":"t"}"#, &categories).is_err());
        let no_id = r#"{"category":{"name":"Tech"},"summary":"s","title":"t"}"#;
        assert!(parse_categorization(no_id, &categories).is_err());
    }

    #[test]
    fn rejects_category_outside_the_offered_set() {
        let categories = cats();
        let raw = format!(
            r#"{{"category":{{"id":"{}","name":"Tech"}},"summary":"s","title":"t"}}"#,
            Uuid::new_v4()
        );
        assert!(parse_categorization(&raw, &categories).is_err());
    }

    #[test]
    fn clamps_long_fields() {
        let categories = cats();
        let raw = format!(
            r#"{{"category":{{"id":"{}"}},"summary":"{}","title":"{}"}}"#,
            categories[1].id,
            "s".repeat(300),
            "é".repeat(80)
        );
        let out = parse_categorization(&raw, &categories).unwrap();
        assert_eq!(out.title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(out.summary.chars().count(), MAX_SUMMARY_CHARS);
    }
}
