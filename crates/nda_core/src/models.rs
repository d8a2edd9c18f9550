use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Languages supported by feed and search query sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
    Fr,
    Es,
    It,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "de" => Some(Language::De),
            "en" => Some(Language::En),
            "fr" => Some(Language::Fr),
            "es" => Some(Language::Es),
            "it" => Some(Language::It),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Tech,
    Business,
    Politics,
    Science,
    Sports,
    Culture,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Tech => "tech",
            Category::Business => "business",
            Category::Politics => "politics",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Culture => "culture",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(Category::General),
            "tech" => Some(Category::Tech),
            "business" => Some(Category::Business),
            "politics" => Some(Category::Politics),
            "science" => Some(Category::Science),
            "sports" => Some(Category::Sports),
            "culture" => Some(Category::Culture),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Feeds
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub language: Language,
    pub category: Option<Category>,
    pub enabled: bool,
    pub article_count: i64,
    pub last_fetched: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCreate {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub language: Option<Language>,
    pub category: Option<Category>,
    pub enabled: Option<bool>,
}

// ============================================================================
// Articles
// ============================================================================

/// A persisted article as ingested by the automation engine. The API never
/// writes article content itself, it only reads, filters and deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub content: Option<String>,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub processed: bool,
    pub sent: bool,
    pub fetched_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub source: Option<String>,
    pub processed: Option<bool>,
    pub sent: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Digest recipients
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientCreate {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipientUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

// ============================================================================
// Search queries
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub id: Uuid,
    pub name: String,
    pub query: String,
    pub language: Language,
    pub category: Option<Category>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQueryCreate {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQueryUpdate {
    pub name: Option<String>,
    pub query: Option<String>,
    pub language: Option<Language>,
    pub category: Option<Category>,
    pub enabled: Option<bool>,
}

// ============================================================================
// X accounts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XAccount {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub language: Language,
    pub category: Option<Category>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XAccountCreate {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XAccountUpdate {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub language: Option<Language>,
    pub category: Option<Category>,
    pub enabled: Option<bool>,
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_feeds: i64,
    pub active_feeds: i64,
    pub total_articles: i64,
    pub processed_articles: i64,
    pub unsent_articles: i64,
    pub last_scrape: Option<DateTime<Utc>>,
    pub last_summarization: Option<DateTime<Utc>>,
}
