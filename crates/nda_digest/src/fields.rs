use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FALLBACK_TITLE: &str = "Kein Titel";
pub const FALLBACK_SOURCE: &str = "Unbekannte Quelle";
pub const FALLBACK_SUMMARY: &str = "Keine Zusammenfassung verfügbar";
pub const FALLBACK_URL: &str = "#";
pub const FALLBACK_DATE: &str = "Datum unbekannt";

/// Loosely-typed article record as submitted to the render endpoint. Every
/// field the renderer reads is explicitly optional; unknown keys in the
/// payload are discarded during deserialization. Rendering must never fail
/// because one of these is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestArticle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<PublishedAt>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Publication timestamps arrive either as a proper timestamp, as a string
/// of varying quality, or as something else entirely. Each shape gets its
/// own formatting branch in [`DigestArticle::display_published`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishedAt {
    Timestamp(DateTime<Utc>),
    Raw(String),
    Other(serde_json::Value),
}

impl DigestArticle {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title).unwrap_or(FALLBACK_TITLE)
    }

    pub fn display_source(&self) -> &str {
        non_empty(&self.source).unwrap_or(FALLBACK_SOURCE)
    }

    pub fn display_summary(&self) -> &str {
        non_empty(&self.summary).unwrap_or(FALLBACK_SUMMARY)
    }

    pub fn display_url(&self) -> &str {
        non_empty(&self.url).unwrap_or(FALLBACK_URL)
    }

    pub fn display_category(&self) -> &str {
        non_empty(&self.category).unwrap_or("")
    }

    pub fn display_priority(&self) -> String {
        non_empty(&self.priority)
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Topics first, then keywords, truncated to five combined entries.
    pub fn display_tags(&self) -> Vec<String> {
        self.topics
            .iter()
            .chain(self.keywords.iter())
            .take(5)
            .cloned()
            .collect()
    }

    /// The image URL, if one is actually usable for an `<img>` block.
    pub fn resolved_image_url(&self) -> Option<&str> {
        non_empty(&self.image_url)
    }

    pub fn display_published(&self) -> String {
        format_published(self.published_at.as_ref())
    }
}

impl From<&nda_core::models::Article> for DigestArticle {
    fn from(article: &nda_core::models::Article) -> Self {
        DigestArticle {
            id: Some(article.id.to_string()),
            title: Some(article.title.clone()),
            source: Some(article.source.clone()),
            summary: article.summary.clone(),
            url: Some(article.url.clone()),
            published_at: article.published_at.map(PublishedAt::Timestamp),
            priority: article.priority.clone(),
            category: article.category.clone(),
            topics: article.topics.clone(),
            keywords: article.keywords.clone(),
            image_url: article.image_url.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Ordered formatting chain for the publication date: a native timestamp
/// formats directly, a string is parsed as ISO-8601 (trailing `Z`
/// tolerated) and reformatted, anything unparseable degrades to the first
/// ten characters of the raw value, and an absent or empty value becomes
/// the fixed fallback. Nothing in here can fail.
pub fn format_published(value: Option<&PublishedAt>) -> String {
    match value {
        None => FALLBACK_DATE.to_string(),
        Some(PublishedAt::Timestamp(ts)) => ts.format("%d.%m.%Y").to_string(),
        Some(PublishedAt::Raw(raw)) => {
            if raw.trim().is_empty() {
                return FALLBACK_DATE.to_string();
            }
            match parse_iso_date(raw) {
                Some(date) => date.format("%d.%m.%Y").to_string(),
                None => clip(raw),
            }
        }
        Some(PublishedAt::Other(value)) => {
            if value.is_null() {
                return FALLBACK_DATE.to_string();
            }
            let raw = value.to_string();
            if raw.trim().is_empty() {
                FALLBACK_DATE.to_string()
            } else {
                clip(&raw)
            }
        }
    }
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    let bare = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    if let Ok(dt) = NaiveDateTime::parse_from_str(bare, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(bare, "%Y-%m-%d").ok()
}

fn clip(raw: &str) -> String {
    raw.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn all_fallbacks_apply_to_an_empty_record() {
        let article = DigestArticle::default();
        assert_eq!(article.display_title(), FALLBACK_TITLE);
        assert_eq!(article.display_source(), FALLBACK_SOURCE);
        assert_eq!(article.display_summary(), FALLBACK_SUMMARY);
        assert_eq!(article.display_url(), FALLBACK_URL);
        assert_eq!(article.display_category(), "");
        assert_eq!(article.display_priority(), "");
        assert_eq!(article.display_published(), FALLBACK_DATE);
        assert!(article.display_tags().is_empty());
        assert!(article.resolved_image_url().is_none());
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let article = DigestArticle {
            title: Some("   ".to_string()),
            image_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(article.display_title(), FALLBACK_TITLE);
        assert!(article.resolved_image_url().is_none());
    }

    #[test]
    fn priority_is_lowercased() {
        let article = DigestArticle {
            priority: Some("HIGH".to_string()),
            ..Default::default()
        };
        assert_eq!(article.display_priority(), "high");
    }

    #[test]
    fn native_timestamp_formats_directly() {
        let ts = Utc.with_ymd_and_hms(2025, 8, 4, 10, 30, 0).unwrap();
        assert_eq!(
            format_published(Some(&PublishedAt::Timestamp(ts))),
            "04.08.2025"
        );
    }

    #[test]
    fn iso_string_with_trailing_z_is_reformatted() {
        let raw = PublishedAt::Raw("2025-08-04T10:30:00Z".to_string());
        assert_eq!(format_published(Some(&raw)), "04.08.2025");
    }

    #[test]
    fn iso_string_without_offset_is_reformatted() {
        let raw = PublishedAt::Raw("2025-08-04T10:30:00".to_string());
        assert_eq!(format_published(Some(&raw)), "04.08.2025");
        let plain = PublishedAt::Raw("2025-08-04".to_string());
        assert_eq!(format_published(Some(&plain)), "04.08.2025");
    }

    #[test]
    fn unparseable_string_degrades_to_first_ten_chars() {
        let raw = PublishedAt::Raw("gestern irgendwann".to_string());
        assert_eq!(format_published(Some(&raw)), "gestern ir");
    }

    #[test]
    fn empty_string_falls_back_to_unknown_date() {
        let raw = PublishedAt::Raw("  ".to_string());
        assert_eq!(format_published(Some(&raw)), FALLBACK_DATE);
    }

    #[test]
    fn non_string_value_is_stringified_and_clipped() {
        let other = PublishedAt::Other(serde_json::json!(1722765000));
        assert_eq!(format_published(Some(&other)), "1722765000");
        let null = PublishedAt::Other(serde_json::Value::Null);
        assert_eq!(format_published(Some(&null)), FALLBACK_DATE);
    }

    #[test]
    fn tags_concatenate_topics_before_keywords_and_truncate_to_five() {
        let article = DigestArticle {
            topics: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            keywords: vec!["e".into(), "f".into(), "g".into(), "h".into()],
            ..Default::default()
        };
        assert_eq!(article.display_tags(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn unknown_payload_keys_are_ignored() {
        let article: DigestArticle = serde_json::from_str(
            r#"{"id": "abc", "title": "T", "some_upstream_field": {"x": 1}}"#,
        )
        .unwrap();
        assert_eq!(article.id.as_deref(), Some("abc"));
        assert_eq!(article.display_title(), "T");
    }

    #[test]
    fn iso_payload_string_deserializes_as_timestamp() {
        let article: DigestArticle =
            serde_json::from_str(r#"{"published_at": "2025-08-04T10:30:00Z"}"#).unwrap();
        assert!(matches!(
            article.published_at,
            Some(PublishedAt::Timestamp(_))
        ));
        assert_eq!(article.display_published(), "04.08.2025");
    }
}
