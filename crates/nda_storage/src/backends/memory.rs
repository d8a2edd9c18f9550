use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use nda_core::models::{
    Article, ArticleFilter, Feed, FeedCreate, FeedUpdate, Recipient, RecipientCreate,
    RecipientUpdate, SearchQuery, SearchQueryCreate, SearchQueryUpdate, StatsSnapshot, XAccount,
    XAccountCreate, XAccountUpdate,
};
use nda_core::storage::{
    ArticleStore, FeedStore, RecipientStore, SearchQueryStore, StatsStore, XAccountStore,
};
use nda_core::{Error, Result};

#[derive(Default)]
struct Inner {
    feeds: Vec<Feed>,
    articles: Vec<Article>,
    recipients: Vec<Recipient>,
    search_queries: Vec<SearchQuery>,
    x_accounts: Vec<XAccount>,
}

/// In-memory store for tests and local development. Keeps the same
/// semantics as the Postgres backend, including uniqueness checks and
/// newest-first ordering.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an article directly. Articles are normally written by the
    /// automation engine, so the API has no create endpoint for them.
    pub async fn add_article(&self, article: Article) {
        let mut inner = self.inner.write().await;
        inner.articles.push(article);
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let inner = self.inner.read().await;
        let mut articles: Vec<Article> = inner
            .articles
            .iter()
            .filter(|a| filter.source.as_deref().map_or(true, |s| a.source == s))
            .filter(|a| filter.processed.map_or(true, |p| a.processed == p))
            .filter(|a| filter.sent.map_or(true, |s| a.sent == s))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));

        Ok(articles
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let inner = self.inner.read().await;
        Ok(inner.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.articles.len();
        inner.articles.retain(|a| a.id != id);
        Ok(inner.articles.len() < before)
    }

    async fn list_digest_articles(&self, include_sent: bool) -> Result<Vec<Article>> {
        let inner = self.inner.read().await;
        let mut articles: Vec<Article> = inner
            .articles
            .iter()
            .filter(|a| a.processed && (include_sent || !a.sent))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
        Ok(articles)
    }

    async fn count_digest_articles(&self, include_sent: bool) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .articles
            .iter()
            .filter(|a| a.processed && (include_sent || !a.sent))
            .count() as i64)
    }

    async fn lookup_image_urls(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        let inner = self.inner.read().await;
        let mut found = HashMap::new();
        for id in ids {
            let Ok(uuid) = Uuid::parse_str(id) else {
                continue;
            };
            if let Some(article) = inner.articles.iter().find(|a| a.id == uuid) {
                if let Some(url) = article.image_url.as_deref() {
                    if !url.is_empty() {
                        found.insert(id.clone(), url.to_string());
                    }
                }
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn create_feed(&self, feed: &FeedCreate) -> Result<Feed> {
        let mut inner = self.inner.write().await;
        if inner.feeds.iter().any(|f| f.url == feed.url) {
            return Err(Error::Duplicate("Feed with this URL".to_string()));
        }

        let created = Feed {
            id: Uuid::new_v4(),
            name: feed.name.clone(),
            url: feed.url.clone(),
            language: feed.language,
            category: feed.category,
            enabled: feed.enabled,
            article_count: 0,
            last_fetched: None,
            created_at: Utc::now(),
        };
        inner.feeds.push(created.clone());
        Ok(created)
    }

    async fn list_feeds(&self, enabled_only: bool) -> Result<Vec<Feed>> {
        let inner = self.inner.read().await;
        let mut feeds: Vec<Feed> = inner
            .feeds
            .iter()
            .filter(|f| !enabled_only || f.enabled)
            .cloned()
            .collect();
        feeds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(feeds)
    }

    async fn get_feed(&self, id: Uuid) -> Result<Option<Feed>> {
        let inner = self.inner.read().await;
        Ok(inner.feeds.iter().find(|f| f.id == id).cloned())
    }

    async fn update_feed(&self, id: Uuid, update: &FeedUpdate) -> Result<Option<Feed>> {
        let mut inner = self.inner.write().await;
        if let Some(url) = &update.url {
            if inner.feeds.iter().any(|f| f.id != id && &f.url == url) {
                return Err(Error::Duplicate("Feed with this URL".to_string()));
            }
        }

        let Some(feed) = inner.feeds.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            feed.name = name.clone();
        }
        if let Some(url) = &update.url {
            feed.url = url.clone();
        }
        if let Some(language) = update.language {
            feed.language = language;
        }
        if let Some(category) = update.category {
            feed.category = Some(category);
        }
        if let Some(enabled) = update.enabled {
            feed.enabled = enabled;
        }
        Ok(Some(feed.clone()))
    }

    async fn delete_feed(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.feeds.len();
        inner.feeds.retain(|f| f.id != id);
        Ok(inner.feeds.len() < before)
    }
}

#[async_trait]
impl RecipientStore for MemoryStore {
    async fn create_recipient(&self, recipient: &RecipientCreate) -> Result<Recipient> {
        let mut inner = self.inner.write().await;
        if inner.recipients.iter().any(|r| r.email == recipient.email) {
            return Err(Error::Duplicate("Recipient with this email".to_string()));
        }

        let created = Recipient {
            id: Uuid::new_v4(),
            email: recipient.email.clone(),
            name: recipient.name.clone(),
            enabled: recipient.enabled,
            created_at: Utc::now(),
        };
        inner.recipients.push(created.clone());
        Ok(created)
    }

    async fn list_recipients(&self, enabled_only: bool) -> Result<Vec<Recipient>> {
        let inner = self.inner.read().await;
        let mut recipients: Vec<Recipient> = inner
            .recipients
            .iter()
            .filter(|r| !enabled_only || r.enabled)
            .cloned()
            .collect();
        recipients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipients)
    }

    async fn get_recipient(&self, id: Uuid) -> Result<Option<Recipient>> {
        let inner = self.inner.read().await;
        Ok(inner.recipients.iter().find(|r| r.id == id).cloned())
    }

    async fn update_recipient(
        &self,
        id: Uuid,
        update: &RecipientUpdate,
    ) -> Result<Option<Recipient>> {
        let mut inner = self.inner.write().await;
        if let Some(email) = &update.email {
            if inner
                .recipients
                .iter()
                .any(|r| r.id != id && &r.email == email)
            {
                return Err(Error::Duplicate("Recipient with this email".to_string()));
            }
        }

        let Some(recipient) = inner.recipients.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &update.email {
            recipient.email = email.clone();
        }
        if let Some(name) = &update.name {
            recipient.name = Some(name.clone());
        }
        if let Some(enabled) = update.enabled {
            recipient.enabled = enabled;
        }
        Ok(Some(recipient.clone()))
    }

    async fn delete_recipient(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.recipients.len();
        inner.recipients.retain(|r| r.id != id);
        Ok(inner.recipients.len() < before)
    }

    async fn toggle_recipient(&self, id: Uuid) -> Result<Option<Recipient>> {
        let mut inner = self.inner.write().await;
        let Some(recipient) = inner.recipients.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        recipient.enabled = !recipient.enabled;
        Ok(Some(recipient.clone()))
    }

    async fn set_recipient_enabled(&self, id: Uuid, enabled: bool) -> Result<Option<Recipient>> {
        let mut inner = self.inner.write().await;
        let Some(recipient) = inner.recipients.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        recipient.enabled = enabled;
        Ok(Some(recipient.clone()))
    }
}

#[async_trait]
impl SearchQueryStore for MemoryStore {
    async fn create_search_query(&self, query: &SearchQueryCreate) -> Result<SearchQuery> {
        let mut inner = self.inner.write().await;
        if inner.search_queries.iter().any(|q| q.query == query.query) {
            return Err(Error::Duplicate("Search query with this query".to_string()));
        }

        let created = SearchQuery {
            id: Uuid::new_v4(),
            name: query.name.clone(),
            query: query.query.clone(),
            language: query.language,
            category: query.category,
            enabled: query.enabled,
            created_at: Utc::now(),
        };
        inner.search_queries.push(created.clone());
        Ok(created)
    }

    async fn list_search_queries(&self, enabled_only: bool) -> Result<Vec<SearchQuery>> {
        let inner = self.inner.read().await;
        let mut queries: Vec<SearchQuery> = inner
            .search_queries
            .iter()
            .filter(|q| !enabled_only || q.enabled)
            .cloned()
            .collect();
        queries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(queries)
    }

    async fn get_search_query(&self, id: Uuid) -> Result<Option<SearchQuery>> {
        let inner = self.inner.read().await;
        Ok(inner.search_queries.iter().find(|q| q.id == id).cloned())
    }

    async fn update_search_query(
        &self,
        id: Uuid,
        update: &SearchQueryUpdate,
    ) -> Result<Option<SearchQuery>> {
        let mut inner = self.inner.write().await;
        if let Some(query) = &update.query {
            if inner
                .search_queries
                .iter()
                .any(|q| q.id != id && &q.query == query)
            {
                return Err(Error::Duplicate("Search query with this query".to_string()));
            }
        }

        let Some(sq) = inner.search_queries.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            sq.name = name.clone();
        }
        if let Some(query) = &update.query {
            sq.query = query.clone();
        }
        if let Some(language) = update.language {
            sq.language = language;
        }
        if let Some(category) = update.category {
            sq.category = Some(category);
        }
        if let Some(enabled) = update.enabled {
            sq.enabled = enabled;
        }
        Ok(Some(sq.clone()))
    }

    async fn delete_search_query(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.search_queries.len();
        inner.search_queries.retain(|q| q.id != id);
        Ok(inner.search_queries.len() < before)
    }

    async fn toggle_search_query(&self, id: Uuid) -> Result<Option<SearchQuery>> {
        let mut inner = self.inner.write().await;
        let Some(sq) = inner.search_queries.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        sq.enabled = !sq.enabled;
        Ok(Some(sq.clone()))
    }

    async fn set_search_query_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<Option<SearchQuery>> {
        let mut inner = self.inner.write().await;
        let Some(sq) = inner.search_queries.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        sq.enabled = enabled;
        Ok(Some(sq.clone()))
    }
}

#[async_trait]
impl XAccountStore for MemoryStore {
    async fn create_x_account(&self, account: &XAccountCreate) -> Result<XAccount> {
        let mut inner = self.inner.write().await;
        if inner
            .x_accounts
            .iter()
            .any(|a| a.username == account.username)
        {
            return Err(Error::Duplicate("Account with this username".to_string()));
        }

        let created = XAccount {
            id: Uuid::new_v4(),
            username: account.username.clone(),
            display_name: account.display_name.clone(),
            language: account.language,
            category: account.category,
            enabled: account.enabled,
            created_at: Utc::now(),
        };
        inner.x_accounts.push(created.clone());
        Ok(created)
    }

    async fn list_x_accounts(&self, enabled_only: bool) -> Result<Vec<XAccount>> {
        let inner = self.inner.read().await;
        let mut accounts: Vec<XAccount> = inner
            .x_accounts
            .iter()
            .filter(|a| !enabled_only || a.enabled)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn get_x_account(&self, id: Uuid) -> Result<Option<XAccount>> {
        let inner = self.inner.read().await;
        Ok(inner.x_accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn update_x_account(
        &self,
        id: Uuid,
        update: &XAccountUpdate,
    ) -> Result<Option<XAccount>> {
        let mut inner = self.inner.write().await;
        if let Some(username) = &update.username {
            if inner
                .x_accounts
                .iter()
                .any(|a| a.id != id && &a.username == username)
            {
                return Err(Error::Duplicate("Account with this username".to_string()));
            }
        }

        let Some(account) = inner.x_accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(username) = &update.username {
            account.username = username.clone();
        }
        if let Some(display_name) = &update.display_name {
            account.display_name = Some(display_name.clone());
        }
        if let Some(language) = update.language {
            account.language = language;
        }
        if let Some(category) = update.category {
            account.category = Some(category);
        }
        if let Some(enabled) = update.enabled {
            account.enabled = enabled;
        }
        Ok(Some(account.clone()))
    }

    async fn delete_x_account(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.x_accounts.len();
        inner.x_accounts.retain(|a| a.id != id);
        Ok(inner.x_accounts.len() < before)
    }

    async fn toggle_x_account(&self, id: Uuid) -> Result<Option<XAccount>> {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.x_accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        account.enabled = !account.enabled;
        Ok(Some(account.clone()))
    }

    async fn set_x_account_enabled(&self, id: Uuid, enabled: bool) -> Result<Option<XAccount>> {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.x_accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        account.enabled = enabled;
        Ok(Some(account.clone()))
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn stats(&self) -> Result<StatsSnapshot> {
        let inner = self.inner.read().await;
        Ok(StatsSnapshot {
            total_feeds: inner.feeds.len() as i64,
            active_feeds: inner.feeds.iter().filter(|f| f.enabled).count() as i64,
            total_articles: inner.articles.len() as i64,
            processed_articles: inner.articles.iter().filter(|a| a.processed).count() as i64,
            unsent_articles: inner
                .articles
                .iter()
                .filter(|a| a.processed && !a.sent)
                .count() as i64,
            last_scrape: inner.articles.iter().map(|a| a.fetched_at).max(),
            last_summarization: inner
                .articles
                .iter()
                .filter(|a| a.processed)
                .map(|a| a.fetched_at)
                .max(),
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
