use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Article, ArticleFilter, Feed, FeedCreate, FeedUpdate, Recipient, RecipientCreate,
    RecipientUpdate, SearchQuery, SearchQueryCreate, SearchQueryUpdate, StatsSnapshot, XAccount,
    XAccountCreate, XAccountUpdate,
};
use crate::Result;

/// Read side of the article table. The digest core depends on this trait
/// only, so tests can substitute a mock store.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>>;

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>>;

    /// Returns true when a row was deleted.
    async fn delete_article(&self, id: Uuid) -> Result<bool>;

    /// Processed articles for the digest, newest fetch first. With
    /// `include_sent` false only unsent articles are returned, which is what
    /// would actually be emailed.
    async fn list_digest_articles(&self, include_sent: bool) -> Result<Vec<Article>>;

    async fn count_digest_articles(&self, include_sent: bool) -> Result<i64>;

    /// Batched image lookup for digest enrichment. Only rows with a
    /// non-empty image URL appear in the result; unknown ids are skipped.
    async fn lookup_image_urls(&self, ids: &[String]) -> Result<HashMap<String, String>>;
}

#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn create_feed(&self, feed: &FeedCreate) -> Result<Feed>;

    async fn list_feeds(&self, enabled_only: bool) -> Result<Vec<Feed>>;

    async fn get_feed(&self, id: Uuid) -> Result<Option<Feed>>;

    async fn update_feed(&self, id: Uuid, update: &FeedUpdate) -> Result<Option<Feed>>;

    async fn delete_feed(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait RecipientStore: Send + Sync {
    async fn create_recipient(&self, recipient: &RecipientCreate) -> Result<Recipient>;

    async fn list_recipients(&self, enabled_only: bool) -> Result<Vec<Recipient>>;

    async fn get_recipient(&self, id: Uuid) -> Result<Option<Recipient>>;

    async fn update_recipient(
        &self,
        id: Uuid,
        update: &RecipientUpdate,
    ) -> Result<Option<Recipient>>;

    async fn delete_recipient(&self, id: Uuid) -> Result<bool>;

    async fn toggle_recipient(&self, id: Uuid) -> Result<Option<Recipient>>;

    async fn set_recipient_enabled(&self, id: Uuid, enabled: bool) -> Result<Option<Recipient>>;
}

#[async_trait]
pub trait SearchQueryStore: Send + Sync {
    async fn create_search_query(&self, query: &SearchQueryCreate) -> Result<SearchQuery>;

    async fn list_search_queries(&self, enabled_only: bool) -> Result<Vec<SearchQuery>>;

    async fn get_search_query(&self, id: Uuid) -> Result<Option<SearchQuery>>;

    async fn update_search_query(
        &self,
        id: Uuid,
        update: &SearchQueryUpdate,
    ) -> Result<Option<SearchQuery>>;

    async fn delete_search_query(&self, id: Uuid) -> Result<bool>;

    async fn toggle_search_query(&self, id: Uuid) -> Result<Option<SearchQuery>>;

    async fn set_search_query_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<Option<SearchQuery>>;
}

#[async_trait]
pub trait XAccountStore: Send + Sync {
    async fn create_x_account(&self, account: &XAccountCreate) -> Result<XAccount>;

    async fn list_x_accounts(&self, enabled_only: bool) -> Result<Vec<XAccount>>;

    async fn get_x_account(&self, id: Uuid) -> Result<Option<XAccount>>;

    async fn update_x_account(&self, id: Uuid, update: &XAccountUpdate)
        -> Result<Option<XAccount>>;

    async fn delete_x_account(&self, id: Uuid) -> Result<bool>;

    async fn toggle_x_account(&self, id: Uuid) -> Result<Option<XAccount>>;

    async fn set_x_account_enabled(&self, id: Uuid, enabled: bool) -> Result<Option<XAccount>>;
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn stats(&self) -> Result<StatsSnapshot>;

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<()>;
}

/// Everything the web layer needs from persistence.
pub trait Store:
    ArticleStore + FeedStore + RecipientStore + SearchQueryStore + XAccountStore + StatsStore
{
}

impl<T> Store for T where
    T: ArticleStore + FeedStore + RecipientStore + SearchQueryStore + XAccountStore + StatsStore
{
}
