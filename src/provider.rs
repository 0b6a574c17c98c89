use std::sync::Arc;

use futures::future::join_all;
use spdlog::error;

use crate::normalize::{normalize, NormalizeError};
use crate::notion::client::SourceError;
use crate::notion::types::PageObject;
use crate::post::{Post, RecordId};
use crate::render_cache::RenderCache;

/// Reference to one record returned by the published-posts query.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub id: RecordId,
}

/// The remote operations the pipeline consumes. `NotionClient` is the
/// production implementation; tests substitute canned records.
pub trait RecordSource {
    async fn query_published(&self) -> Result<Vec<RecordSummary>, SourceError>;
    async fn retrieve_page(&self, id: &RecordId) -> Result<PageObject, SourceError>;
    async fn page_markdown(&self, id: &RecordId) -> Result<String, SourceError>;
}

const QUERY_KEY: &str = "published";

/// Fetch-and-normalize pipeline for one render.
///
/// Holds the render's memoization caches: the published query and each
/// per-record outcome (including skips) are fetched at most once. Drop
/// the provider and the memo goes with it.
pub struct PostProvider<'a, S: RecordSource> {
    source: &'a S,
    summaries: RenderCache<Vec<RecordSummary>>,
    posts: RenderCache<Option<Arc<Post>>>,
}

impl<'a, S: RecordSource> PostProvider<'a, S> {
    pub fn new(source: &'a S) -> Self {
        PostProvider {
            source,
            summaries: RenderCache::new(),
            posts: RenderCache::new(),
        }
    }

    /// All published posts, in the query's descending-date order. Records
    /// that fail to normalize are dropped; their absence is the only
    /// signal the caller gets.
    pub async fn published(&self) -> Result<Vec<Arc<Post>>, SourceError> {
        let summaries = self.summaries().await?;
        let fetches = summaries.iter().map(|summary| self.post(&summary.id));
        let posts = join_all(fetches).await;
        Ok(posts.into_iter().flatten().collect())
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<Arc<Post>>, SourceError> {
        let posts = self.published().await?;
        Ok(posts.into_iter().find(|post| post.slug == slug))
    }

    async fn summaries(&self) -> Result<Vec<RecordSummary>, SourceError> {
        if let Some(hit) = self.summaries.get(QUERY_KEY) {
            return Ok(hit);
        }
        let fetched = self.source.query_published().await?;
        Ok(self.summaries.put(QUERY_KEY, fetched))
    }

    /// One record's outcome. A failure is logged, memoized and mapped to
    /// None so a malformed record is skipped instead of failing the batch.
    pub async fn post(&self, id: &RecordId) -> Option<Arc<Post>> {
        if let Some(hit) = self.posts.get(&id.0) {
            return hit;
        }

        let value = match self.fetch_and_normalize(id).await {
            Ok(post) => Some(Arc::new(post)),
            Err(e) => {
                error!("Skipping record {}: {}", id, e);
                None
            }
        };
        self.posts.put(&id.0, value)
    }

    async fn fetch_and_normalize(&self, id: &RecordId) -> Result<Post, NormalizeError> {
        let page = self.source.retrieve_page(id).await?;
        let content = self.source.page_markdown(id).await?;
        normalize(&page, content)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct StubSource {
        records: Vec<(String, serde_json::Value, String)>,
        page_calls: Mutex<HashMap<String, usize>>,
        query_calls: Mutex<usize>,
    }

    impl StubSource {
        fn new(records: Vec<(&str, serde_json::Value, &str)>) -> Self {
            StubSource {
                records: records
                    .into_iter()
                    .map(|(id, page, md)| (id.to_string(), page, md.to_string()))
                    .collect(),
                page_calls: Mutex::new(HashMap::new()),
                query_calls: Mutex::new(0),
            }
        }

        fn page_calls(&self, id: &str) -> usize {
            *self.page_calls.lock().unwrap().get(id).unwrap_or(&0)
        }

        fn record(&self, id: &RecordId) -> Result<&(String, serde_json::Value, String), SourceError> {
            self.records
                .iter()
                .find(|(record_id, _, _)| record_id == &id.0)
                .ok_or(SourceError::Api {
                    status: 404,
                    message: "no such record".to_string(),
                })
        }
    }

    impl RecordSource for StubSource {
        async fn query_published(&self) -> Result<Vec<RecordSummary>, SourceError> {
            *self.query_calls.lock().unwrap() += 1;
            Ok(self
                .records
                .iter()
                .map(|(id, _, _)| RecordSummary {
                    id: RecordId(id.clone()),
                })
                .collect())
        }

        async fn retrieve_page(&self, id: &RecordId) -> Result<PageObject, SourceError> {
            *self.page_calls.lock().unwrap().entry(id.0.clone()).or_insert(0) += 1;
            let (_, page, _) = self.record(id)?;
            Ok(serde_json::from_value(page.clone()).unwrap())
        }

        async fn page_markdown(&self, id: &RecordId) -> Result<String, SourceError> {
            let (_, _, md) = self.record(id)?;
            Ok(md.clone())
        }
    }

    fn record(id: &str, slug: Option<&str>) -> serde_json::Value {
        let mut properties = json!({
            "Title": { "type": "title", "title": [ { "plain_text": format!("Post {}", id) } ] }
        });
        if let Some(slug) = slug {
            properties["Slug"] = json!({
                "type": "rich_text", "rich_text": [ { "plain_text": slug } ]
            });
        }
        json!({ "id": id, "properties": properties })
    }

    #[tokio::test]
    async fn test_batch_skips_malformed_records_and_keeps_order() {
        let source = StubSource::new(vec![
            ("r1", record("r1", Some("first")), "First body"),
            ("r2", record("r2", None), "No slug here"),
            ("r3", record("r3", Some("third")), "Third body"),
        ]);
        let provider = PostProvider::new(&source);

        let posts = provider.published().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "first");
        assert_eq!(posts[1].slug, "third");

        // Normalization ran exactly once per summary
        assert_eq!(source.page_calls("r1"), 1);
        assert_eq!(source.page_calls("r2"), 1);
        assert_eq!(source.page_calls("r3"), 1);
    }

    #[tokio::test]
    async fn test_render_scoped_memoization() {
        let source = StubSource::new(vec![("r1", record("r1", Some("only")), "Body")]);
        let provider = PostProvider::new(&source);

        let first = provider.post(&RecordId("r1".to_string())).await.unwrap();
        let second = provider.post(&RecordId("r1".to_string())).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(source.page_calls("r1"), 1);

        // A second render starts from a cold cache
        let next_render = PostProvider::new(&source);
        let third = next_render.post(&RecordId("r1".to_string())).await.unwrap();
        assert_eq!(*first, *third);
        assert_eq!(source.page_calls("r1"), 2);
    }

    #[tokio::test]
    async fn test_failed_records_are_memoized_as_absent() {
        let source = StubSource::new(vec![("r1", record("r1", None), "Body")]);
        let provider = PostProvider::new(&source);

        let id = RecordId("r1".to_string());
        assert!(provider.post(&id).await.is_none());
        assert!(provider.post(&id).await.is_none());
        assert_eq!(source.page_calls("r1"), 1);
    }

    #[tokio::test]
    async fn test_published_reuses_the_query_within_a_render() {
        let source = StubSource::new(vec![("r1", record("r1", Some("one")), "Body")]);
        let provider = PostProvider::new(&source);

        provider.published().await.unwrap();
        provider.published().await.unwrap();
        assert_eq!(*source.query_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_post_by_slug() {
        let source = StubSource::new(vec![
            ("r1", record("r1", Some("first")), "Body"),
            ("r2", record("r2", Some("second")), "Body"),
        ]);
        let provider = PostProvider::new(&source);

        let hit = provider.post_by_slug("second").await.unwrap();
        assert_eq!(hit.unwrap().slug, "second");

        let miss = provider.post_by_slug("nope").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_retrieval_error_skips_only_that_record() {
        struct HalfBroken(StubSource);

        impl RecordSource for HalfBroken {
            async fn query_published(&self) -> Result<Vec<RecordSummary>, SourceError> {
                Ok(vec![
                    RecordSummary { id: RecordId("gone".to_string()) },
                    RecordSummary { id: RecordId("r1".to_string()) },
                ])
            }
            async fn retrieve_page(&self, id: &RecordId) -> Result<PageObject, SourceError> {
                self.0.retrieve_page(id).await
            }
            async fn page_markdown(&self, id: &RecordId) -> Result<String, SourceError> {
                self.0.page_markdown(id).await
            }
        }

        let source = HalfBroken(StubSource::new(vec![(
            "r1",
            record("r1", Some("survivor")),
            "Body",
        )]));
        let provider = PostProvider::new(&source);

        let posts = provider.published().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "survivor");
    }
}
