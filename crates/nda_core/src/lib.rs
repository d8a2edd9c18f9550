pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::Config;
pub use error::Error;
pub use models::{
    Article, ArticleFilter, Category, Feed, FeedCreate, FeedUpdate, Language, Recipient,
    RecipientCreate, RecipientUpdate, SearchQuery, SearchQueryCreate, SearchQueryUpdate,
    StatsSnapshot, XAccount, XAccountCreate, XAccountUpdate,
};
pub use storage::{
    ArticleStore, FeedStore, RecipientStore, SearchQueryStore, StatsStore, Store, XAccountStore,
};

pub type Result<T> = std::result::Result<T, Error>;
