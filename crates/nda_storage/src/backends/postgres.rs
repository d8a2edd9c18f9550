use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use uuid::Uuid;

use nda_core::models::{
    Article, ArticleFilter, Category, Feed, FeedCreate, FeedUpdate, Language, Recipient,
    RecipientCreate, RecipientUpdate, SearchQuery, SearchQueryCreate, SearchQueryUpdate,
    StatsSnapshot, XAccount, XAccountCreate, XAccountUpdate,
};
use nda_core::storage::{
    ArticleStore, FeedStore, RecipientStore, SearchQueryStore, StatsStore, XAccountStore,
};
use nda_core::{Error, Result};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS rss_sources (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        url TEXT NOT NULL UNIQUE,
        language TEXT NOT NULL DEFAULT 'de',
        category TEXT,
        enabled BOOLEAN NOT NULL DEFAULT TRUE,
        article_count BIGINT NOT NULL DEFAULT 0,
        last_fetched TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        content TEXT,
        source TEXT NOT NULL,
        published_at TIMESTAMPTZ,
        summary TEXT,
        image_url TEXT,
        category TEXT,
        priority TEXT,
        topics TEXT[] NOT NULL DEFAULT '{}',
        keywords TEXT[] NOT NULL DEFAULT '{}',
        processed BOOLEAN NOT NULL DEFAULT FALSE,
        sent BOOLEAN NOT NULL DEFAULT FALSE,
        fetched_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS digest_recipients (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        name TEXT,
        enabled BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS search_queries (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        query TEXT NOT NULL UNIQUE,
        language TEXT NOT NULL DEFAULT 'de',
        category TEXT,
        enabled BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS x_accounts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username TEXT NOT NULL UNIQUE,
        display_name TEXT,
        language TEXT NOT NULL DEFAULT 'de',
        category TEXT,
        enabled BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    // Add future migrations here
];

/// Postgres-backed store. The automation engine writes articles; this API
/// only reads, filters and deletes them, so every statement here is a thin
/// parameterized query.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

fn map_db_err(context: &str, e: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return Error::Duplicate(context.to_string());
        }
    }
    Error::Database(format!("{}: {}", context, e))
}

fn feed_from_row(row: &PgRow) -> Feed {
    Feed {
        id: row.get("id"),
        name: row.get("name"),
        url: row.get("url"),
        language: Language::parse(&row.get::<String, _>("language")).unwrap_or_default(),
        category: row
            .get::<Option<String>, _>("category")
            .and_then(|c| Category::parse(&c)),
        enabled: row.get("enabled"),
        article_count: row.get("article_count"),
        last_fetched: row.get("last_fetched"),
        created_at: row.get("created_at"),
    }
}

fn article_from_row(row: &PgRow) -> Article {
    Article {
        id: row.get("id"),
        url: row.get("url"),
        title: row.get("title"),
        content: row.get("content"),
        source: row.get("source"),
        published_at: row.get("published_at"),
        summary: row.get("summary"),
        image_url: row.get("image_url"),
        category: row.get("category"),
        priority: row.get("priority"),
        topics: row.get("topics"),
        keywords: row.get("keywords"),
        processed: row.get("processed"),
        sent: row.get("sent"),
        fetched_at: row.get("fetched_at"),
        created_at: row.get("created_at"),
    }
}

fn recipient_from_row(row: &PgRow) -> Recipient {
    Recipient {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        enabled: row.get("enabled"),
        created_at: row.get("created_at"),
    }
}

fn search_query_from_row(row: &PgRow) -> SearchQuery {
    SearchQuery {
        id: row.get("id"),
        name: row.get("name"),
        query: row.get("query"),
        language: Language::parse(&row.get::<String, _>("language")).unwrap_or_default(),
        category: row
            .get::<Option<String>, _>("category")
            .and_then(|c| Category::parse(&c)),
        enabled: row.get("enabled"),
        created_at: row.get("created_at"),
    }
}

fn x_account_from_row(row: &PgRow) -> XAccount {
    XAccount {
        id: row.get("id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        language: Language::parse(&row.get::<String, _>("language")).unwrap_or_default(),
        category: row
            .get::<Option<String>, _>("category")
            .and_then(|c| Category::parse(&c)),
        enabled: row.get("enabled"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ArticleStore for PgStore {
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            WHERE ($1::text IS NULL OR source = $1)
              AND ($2::bool IS NULL OR processed = $2)
              AND ($3::bool IS NULL OR sent = $3)
            ORDER BY fetched_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.source.as_deref())
        .bind(filter.processed)
        .bind(filter.sent)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list articles: {}", e)))?;

        Ok(rows.iter().map(article_from_row).collect())
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get article: {}", e)))?;

        Ok(row.as_ref().map(article_from_row))
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete article: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_digest_articles(&self, include_sent: bool) -> Result<Vec<Article>> {
        let query = if include_sent {
            "SELECT * FROM articles WHERE processed = TRUE ORDER BY fetched_at DESC"
        } else {
            "SELECT * FROM articles WHERE processed = TRUE AND sent = FALSE ORDER BY fetched_at DESC"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list digest articles: {}", e)))?;

        Ok(rows.iter().map(article_from_row).collect())
    }

    async fn count_digest_articles(&self, include_sent: bool) -> Result<i64> {
        let query = if include_sent {
            "SELECT COUNT(*) FROM articles WHERE processed = TRUE"
        } else {
            "SELECT COUNT(*) FROM articles WHERE processed = TRUE AND sent = FALSE"
        };

        let count: i64 = sqlx::query_scalar(query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count digest articles: {}", e)))?;

        Ok(count)
    }

    async fn lookup_image_urls(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        // Ids that are not valid UUIDs cannot exist in the table, so they
        // are dropped before binding rather than failing the whole batch.
        let uuids: Vec<Uuid> = ids
            .iter()
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();
        if uuids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, image_url FROM articles
            WHERE id = ANY($1) AND image_url IS NOT NULL AND image_url <> ''
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to look up image urls: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                (
                    row.get::<Uuid, _>("id").to_string(),
                    row.get::<String, _>("image_url"),
                )
            })
            .collect())
    }
}

#[async_trait]
impl FeedStore for PgStore {
    async fn create_feed(&self, feed: &FeedCreate) -> Result<Feed> {
        let row = sqlx::query(
            r#"
            INSERT INTO rss_sources (name, url, language, category, enabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(feed.language.as_str())
        .bind(feed.category.map(|c| c.as_str()))
        .bind(feed.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("Feed with this URL", e))?;

        Ok(feed_from_row(&row))
    }

    async fn list_feeds(&self, enabled_only: bool) -> Result<Vec<Feed>> {
        let query = if enabled_only {
            "SELECT * FROM rss_sources WHERE enabled = TRUE ORDER BY created_at DESC"
        } else {
            "SELECT * FROM rss_sources ORDER BY created_at DESC"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list feeds: {}", e)))?;

        Ok(rows.iter().map(feed_from_row).collect())
    }

    async fn get_feed(&self, id: Uuid) -> Result<Option<Feed>> {
        let row = sqlx::query("SELECT * FROM rss_sources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get feed: {}", e)))?;

        Ok(row.as_ref().map(feed_from_row))
    }

    async fn update_feed(&self, id: Uuid, update: &FeedUpdate) -> Result<Option<Feed>> {
        let row = sqlx::query(
            r#"
            UPDATE rss_sources SET
                name = COALESCE($2, name),
                url = COALESCE($3, url),
                language = COALESCE($4, language),
                category = COALESCE($5, category),
                enabled = COALESCE($6, enabled)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.url.as_deref())
        .bind(update.language.map(|l| l.as_str()))
        .bind(update.category.map(|c| c.as_str()))
        .bind(update.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Feed with this URL", e))?;

        Ok(row.as_ref().map(feed_from_row))
    }

    async fn delete_feed(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rss_sources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete feed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RecipientStore for PgStore {
    async fn create_recipient(&self, recipient: &RecipientCreate) -> Result<Recipient> {
        let row = sqlx::query(
            r#"
            INSERT INTO digest_recipients (email, name, enabled)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&recipient.email)
        .bind(recipient.name.as_deref())
        .bind(recipient.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("Recipient with this email", e))?;

        Ok(recipient_from_row(&row))
    }

    async fn list_recipients(&self, enabled_only: bool) -> Result<Vec<Recipient>> {
        let query = if enabled_only {
            "SELECT * FROM digest_recipients WHERE enabled = TRUE ORDER BY created_at DESC"
        } else {
            "SELECT * FROM digest_recipients ORDER BY created_at DESC"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list recipients: {}", e)))?;

        Ok(rows.iter().map(recipient_from_row).collect())
    }

    async fn get_recipient(&self, id: Uuid) -> Result<Option<Recipient>> {
        let row = sqlx::query("SELECT * FROM digest_recipients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get recipient: {}", e)))?;

        Ok(row.as_ref().map(recipient_from_row))
    }

    async fn update_recipient(
        &self,
        id: Uuid,
        update: &RecipientUpdate,
    ) -> Result<Option<Recipient>> {
        let row = sqlx::query(
            r#"
            UPDATE digest_recipients SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                enabled = COALESCE($4, enabled)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.email.as_deref())
        .bind(update.name.as_deref())
        .bind(update.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Recipient with this email", e))?;

        Ok(row.as_ref().map(recipient_from_row))
    }

    async fn delete_recipient(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM digest_recipients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete recipient: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_recipient(&self, id: Uuid) -> Result<Option<Recipient>> {
        let row = sqlx::query(
            "UPDATE digest_recipients SET enabled = NOT enabled WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to toggle recipient: {}", e)))?;

        Ok(row.as_ref().map(recipient_from_row))
    }

    async fn set_recipient_enabled(&self, id: Uuid, enabled: bool) -> Result<Option<Recipient>> {
        let row =
            sqlx::query("UPDATE digest_recipients SET enabled = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(enabled)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to update recipient: {}", e)))?;

        Ok(row.as_ref().map(recipient_from_row))
    }
}

#[async_trait]
impl SearchQueryStore for PgStore {
    async fn create_search_query(&self, query: &SearchQueryCreate) -> Result<SearchQuery> {
        let row = sqlx::query(
            r#"
            INSERT INTO search_queries (name, query, language, category, enabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&query.name)
        .bind(&query.query)
        .bind(query.language.as_str())
        .bind(query.category.map(|c| c.as_str()))
        .bind(query.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("Search query with this query", e))?;

        Ok(search_query_from_row(&row))
    }

    async fn list_search_queries(&self, enabled_only: bool) -> Result<Vec<SearchQuery>> {
        let query = if enabled_only {
            "SELECT * FROM search_queries WHERE enabled = TRUE ORDER BY created_at DESC"
        } else {
            "SELECT * FROM search_queries ORDER BY created_at DESC"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list search queries: {}", e)))?;

        Ok(rows.iter().map(search_query_from_row).collect())
    }

    async fn get_search_query(&self, id: Uuid) -> Result<Option<SearchQuery>> {
        let row = sqlx::query("SELECT * FROM search_queries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get search query: {}", e)))?;

        Ok(row.as_ref().map(search_query_from_row))
    }

    async fn update_search_query(
        &self,
        id: Uuid,
        update: &SearchQueryUpdate,
    ) -> Result<Option<SearchQuery>> {
        let row = sqlx::query(
            r#"
            UPDATE search_queries SET
                name = COALESCE($2, name),
                query = COALESCE($3, query),
                language = COALESCE($4, language),
                category = COALESCE($5, category),
                enabled = COALESCE($6, enabled)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.query.as_deref())
        .bind(update.language.map(|l| l.as_str()))
        .bind(update.category.map(|c| c.as_str()))
        .bind(update.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Search query with this query", e))?;

        Ok(row.as_ref().map(search_query_from_row))
    }

    async fn delete_search_query(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM search_queries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete search query: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_search_query(&self, id: Uuid) -> Result<Option<SearchQuery>> {
        let row = sqlx::query(
            "UPDATE search_queries SET enabled = NOT enabled WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to toggle search query: {}", e)))?;

        Ok(row.as_ref().map(search_query_from_row))
    }

    async fn set_search_query_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<Option<SearchQuery>> {
        let row = sqlx::query("UPDATE search_queries SET enabled = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(enabled)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to update search query: {}", e)))?;

        Ok(row.as_ref().map(search_query_from_row))
    }
}

#[async_trait]
impl XAccountStore for PgStore {
    async fn create_x_account(&self, account: &XAccountCreate) -> Result<XAccount> {
        let row = sqlx::query(
            r#"
            INSERT INTO x_accounts (username, display_name, language, category, enabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&account.username)
        .bind(account.display_name.as_deref())
        .bind(account.language.as_str())
        .bind(account.category.map(|c| c.as_str()))
        .bind(account.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err("Account with this username", e))?;

        Ok(x_account_from_row(&row))
    }

    async fn list_x_accounts(&self, enabled_only: bool) -> Result<Vec<XAccount>> {
        let query = if enabled_only {
            "SELECT * FROM x_accounts WHERE enabled = TRUE ORDER BY created_at DESC"
        } else {
            "SELECT * FROM x_accounts ORDER BY created_at DESC"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list X accounts: {}", e)))?;

        Ok(rows.iter().map(x_account_from_row).collect())
    }

    async fn get_x_account(&self, id: Uuid) -> Result<Option<XAccount>> {
        let row = sqlx::query("SELECT * FROM x_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get X account: {}", e)))?;

        Ok(row.as_ref().map(x_account_from_row))
    }

    async fn update_x_account(
        &self,
        id: Uuid,
        update: &XAccountUpdate,
    ) -> Result<Option<XAccount>> {
        let row = sqlx::query(
            r#"
            UPDATE x_accounts SET
                username = COALESCE($2, username),
                display_name = COALESCE($3, display_name),
                language = COALESCE($4, language),
                category = COALESCE($5, category),
                enabled = COALESCE($6, enabled)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.username.as_deref())
        .bind(update.display_name.as_deref())
        .bind(update.language.map(|l| l.as_str()))
        .bind(update.category.map(|c| c.as_str()))
        .bind(update.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Account with this username", e))?;

        Ok(row.as_ref().map(x_account_from_row))
    }

    async fn delete_x_account(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM x_accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete X account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_x_account(&self, id: Uuid) -> Result<Option<XAccount>> {
        let row =
            sqlx::query("UPDATE x_accounts SET enabled = NOT enabled WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to toggle X account: {}", e)))?;

        Ok(row.as_ref().map(x_account_from_row))
    }

    async fn set_x_account_enabled(&self, id: Uuid, enabled: bool) -> Result<Option<XAccount>> {
        let row = sqlx::query("UPDATE x_accounts SET enabled = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(enabled)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to update X account: {}", e)))?;

        Ok(row.as_ref().map(x_account_from_row))
    }
}

#[async_trait]
impl StatsStore for PgStore {
    async fn stats(&self) -> Result<StatsSnapshot> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM rss_sources) AS total_feeds,
                (SELECT COUNT(*) FROM rss_sources WHERE enabled = TRUE) AS active_feeds,
                (SELECT COUNT(*) FROM articles) AS total_articles,
                (SELECT COUNT(*) FROM articles WHERE processed = TRUE) AS processed_articles,
                (SELECT COUNT(*) FROM articles WHERE processed = TRUE AND sent = FALSE) AS unsent_articles,
                (SELECT MAX(fetched_at) FROM articles) AS last_scrape,
                (SELECT MAX(updated_at) FROM articles WHERE processed = TRUE) AS last_summarization
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to load stats: {}", e)))?;

        Ok(StatsSnapshot {
            total_feeds: row.get("total_feeds"),
            active_feeds: row.get("active_feeds"),
            total_articles: row.get("total_articles"),
            processed_articles: row.get("processed_articles"),
            unsent_articles: row.get("unsent_articles"),
            last_scrape: row.get("last_scrape"),
            last_summarization: row.get("last_summarization"),
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Database unreachable: {}", e)))?;
        Ok(())
    }
}
