use std::env;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::config::Notion;
use crate::notion::markdown::blocks_to_markdown;
use crate::notion::types::{BlockChildrenResponse, BlockNode, PageObject, QueryResponse};
use crate::post::RecordId;
use crate::provider::{RecordSource, RecordSummary};

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";

const API_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

const TOKEN_ENV: &str = "NOTION_TOKEN";
const DATABASE_ID_ENV: &str = "NOTION_DATABASE_ID";

/// Property names expected on the content database.
pub mod schema {
    pub const STATUS: &str = "Status";
    pub const PUBLISHED: &str = "Published";
    pub const PUBLISHED_DATE: &str = "Published Date";
    pub const TITLE: &str = "Title";
    pub const SLUG: &str = "Slug";
    pub const FEATURED_IMAGE: &str = "Featured Image";
    pub const AUTHOR: &str = "Author";
    pub const TAGS: &str = "Tags";
    pub const CATEGORY: &str = "Category";
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("content API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Client for the remote content database.
///
/// Credentials are resolved at construction but not validated: a missing
/// token or database id surfaces as the first query's error, not at boot.
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    database_id: String,
    api_base: String,
}

impl NotionClient {
    pub fn new(config: &Notion) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("caderno/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let token = config
            .token
            .clone()
            .or_else(|| env::var(TOKEN_ENV).ok())
            .unwrap_or_default();
        let database_id = config
            .database_id
            .clone()
            .or_else(|| env::var(DATABASE_ID_ENV).ok())
            .unwrap_or_default();
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(NotionClient {
            http,
            token,
            database_id,
            api_base,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let response = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", API_VERSION)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, SourceError> {
        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", API_VERSION)
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SourceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// Fetches the full block tree below `block_id`, following result
    /// cursors and recursing into blocks that have children.
    fn block_tree(&self, block_id: String) -> BoxFuture<'_, Result<Vec<BlockNode>, SourceError>> {
        Box::pin(async move {
            let mut nodes = vec![];
            let mut cursor: Option<String> = None;

            loop {
                let mut path =
                    format!("/v1/blocks/{}/children?page_size={}", block_id, PAGE_SIZE);
                if let Some(ref c) = cursor {
                    path.push_str("&start_cursor=");
                    path.push_str(c);
                }

                let page: BlockChildrenResponse = self.get_json(&path).await?;
                for block in page.results {
                    let children = if block.has_children {
                        self.block_tree(block.id.clone()).await?
                    } else {
                        vec![]
                    };
                    nodes.push(BlockNode { block, children });
                }

                cursor = match (page.has_more, page.next_cursor) {
                    (true, Some(c)) => Some(c),
                    _ => break,
                };
            }

            Ok(nodes)
        })
    }
}

impl RecordSource for NotionClient {
    async fn query_published(&self) -> Result<Vec<RecordSummary>, SourceError> {
        let mut summaries = vec![];
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "filter": {
                    "property": schema::STATUS,
                    "status": { "equals": schema::PUBLISHED },
                },
                "sorts": [
                    { "property": schema::PUBLISHED_DATE, "direction": "descending" },
                ],
                "page_size": PAGE_SIZE,
            });
            if let Some(ref c) = cursor {
                body["start_cursor"] = json!(c);
            }

            let path = format!("/v1/databases/{}/query", self.database_id);
            let page: QueryResponse = self.post_json(&path, &body).await?;
            summaries.extend(
                page.results
                    .into_iter()
                    .map(|stub| RecordSummary { id: RecordId(stub.id) }),
            );

            cursor = match (page.has_more, page.next_cursor) {
                (true, Some(c)) => Some(c),
                _ => break,
            };
        }

        Ok(summaries)
    }

    async fn retrieve_page(&self, id: &RecordId) -> Result<PageObject, SourceError> {
        self.get_json(&format!("/v1/pages/{}", id)).await
    }

    async fn page_markdown(&self, id: &RecordId) -> Result<String, SourceError> {
        let blocks = self.block_tree(id.0.clone()).await?;
        Ok(blocks_to_markdown(&blocks))
    }
}
