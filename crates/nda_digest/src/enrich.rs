use nda_core::{ArticleStore, Result};
use tracing::debug;

use crate::fields::DigestArticle;

/// Backfills missing article images from the article store before
/// rendering. Upstream payloads may drop `image_url` even when the stored
/// row has one, so every record that carries an id but no usable image is
/// looked up in a single batched query. The caller's input is never
/// mutated; the enriched copies are returned.
///
/// A store failure fails the whole operation: the caller retries rather
/// than silently mailing a digest with images dropped for the wrong reason.
pub async fn enrich_images<S: ArticleStore + ?Sized>(
    store: &S,
    articles: &[DigestArticle],
) -> Result<Vec<DigestArticle>> {
    let mut enriched: Vec<DigestArticle> = articles.to_vec();

    let missing: Vec<String> = enriched
        .iter()
        .filter(|article| article.resolved_image_url().is_none())
        .filter_map(|article| article.id.clone())
        .collect();

    if missing.is_empty() {
        return Ok(enriched);
    }

    let found = store.lookup_image_urls(&missing).await?;
    debug!(
        "🖼️ Image enrichment: {} of {} articles backfilled",
        found.len(),
        missing.len()
    );

    for article in &mut enriched {
        if article.resolved_image_url().is_some() {
            continue;
        }
        if let Some(id) = &article.id {
            if let Some(url) = found.get(id) {
                article.image_url = Some(url.clone());
            }
        }
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nda_core::models::{Article, ArticleFilter};
    use nda_core::Error;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct FakeStore {
        images: HashMap<String, String>,
        lookups: AtomicUsize,
        fail: bool,
    }

    impl FakeStore {
        fn with_images(images: HashMap<String, String>) -> Self {
            Self {
                images,
                lookups: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                images: HashMap::new(),
                lookups: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ArticleStore for FakeStore {
        async fn list_articles(&self, _filter: &ArticleFilter) -> nda_core::Result<Vec<Article>> {
            unimplemented!()
        }

        async fn get_article(&self, _id: Uuid) -> nda_core::Result<Option<Article>> {
            unimplemented!()
        }

        async fn delete_article(&self, _id: Uuid) -> nda_core::Result<bool> {
            unimplemented!()
        }

        async fn list_digest_articles(&self, _include_sent: bool) -> nda_core::Result<Vec<Article>> {
            unimplemented!()
        }

        async fn count_digest_articles(&self, _include_sent: bool) -> nda_core::Result<i64> {
            unimplemented!()
        }

        async fn lookup_image_urls(
            &self,
            ids: &[String],
        ) -> nda_core::Result<HashMap<String, String>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Database("connection refused".to_string()));
            }
            Ok(ids
                .iter()
                .filter_map(|id| self.images.get(id).map(|url| (id.clone(), url.clone())))
                .collect())
        }
    }

    fn article(id: Option<&str>, image_url: Option<&str>) -> DigestArticle {
        DigestArticle {
            id: id.map(str::to_string),
            image_url: image_url.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_images_are_backfilled_without_mutating_input() {
        let store = FakeStore::with_images(HashMap::from([(
            "a".to_string(),
            "https://img.example.com/a.jpg".to_string(),
        )]));
        let input = vec![article(Some("a"), None), article(Some("b"), None)];

        let enriched = enrich_images(&store, &input).await.unwrap();

        assert_eq!(
            enriched[0].image_url.as_deref(),
            Some("https://img.example.com/a.jpg")
        );
        // Id not found in the store: field stays absent, no error.
        assert!(enriched[1].image_url.is_none());
        // Caller's batch is untouched.
        assert!(input[0].image_url.is_none());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn articles_with_images_or_without_ids_skip_the_lookup() {
        let store = FakeStore::with_images(HashMap::new());
        let input = vec![
            article(Some("a"), Some("https://img.example.com/a.jpg")),
            article(None, None),
        ];

        let enriched = enrich_images(&store, &input).await.unwrap();

        // Empty batch: the store is never called.
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(
            enriched[0].image_url.as_deref(),
            Some("https://img.example.com/a.jpg")
        );
    }

    #[tokio::test]
    async fn second_pass_over_enriched_batch_issues_no_lookup() {
        let store = FakeStore::with_images(HashMap::from([(
            "a".to_string(),
            "https://img.example.com/a.jpg".to_string(),
        )]));
        let input = vec![article(Some("a"), None)];

        let first = enrich_images(&store, &input).await.unwrap();
        let second = enrich_images(&store, &first).await.unwrap();

        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(first[0].image_url, second[0].image_url);
    }

    #[tokio::test]
    async fn store_failure_fails_the_enrichment() {
        let store = FakeStore::failing();
        let input = vec![article(Some("a"), None)];

        let result = enrich_images(&store, &input).await;
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
