use std::sync::Arc;

use nda_core::storage::{ArticleStore, Store};
use nda_core::Config;

use crate::workflows::WorkflowClient;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Same store, narrowed to the article read side for the digest path.
    pub articles: Arc<dyn ArticleStore>,
    pub config: Config,
    pub workflows: WorkflowClient,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: Store + 'static,
    {
        let workflows = WorkflowClient::new(config.webhook_base_url.clone());
        Self {
            articles: store.clone(),
            store,
            config,
            workflows,
        }
    }
}
