//! HTTP client for the block store API.
//!
//! Wraps `reqwest` with bearer auth, the API version header, and the
//! pagination loops the endpoints require. All errors map onto
//! [`PagemillError`]; a non-2xx status or a body decode failure fails the
//! whole request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use pagemill_shared::{NotionConfig, PagemillError, Result};

use crate::source::BlockSource;
use crate::wire::{BlockPage, QueryPage, RawDatabase, RawPage};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("pagemill/", env!("CARGO_PKG_VERSION"));

/// Default API origin.
const DEFAULT_BASE_URL: &str = "https://api.notion.com";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Construction options for [`NotionClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API origin. Overridable for tests against a mock server.
    pub base_url: String,
    /// Value of the `Notion-Version` header.
    pub api_version: String,
    /// Records requested per pagination page.
    pub page_size: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_version: "2022-06-28".into(),
            page_size: 100,
            timeout_secs: 30,
        }
    }
}

impl From<&NotionConfig> for ClientOptions {
    fn from(config: &NotionConfig) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_version: config.api_version.clone(),
            page_size: config.page_size,
            timeout_secs: config.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated client for the block store's REST API.
pub struct NotionClient {
    http: reqwest::Client,
    base_url: Url,
    page_size: u32,
}

impl NotionClient {
    /// Create a new client with the given integration token.
    pub fn new(token: &str, options: ClientOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| PagemillError::config("API token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&options.api_version).map_err(|_| {
            PagemillError::config(format!("invalid api version '{}'", options.api_version))
        })?;
        headers.insert("Notion-Version", version);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| PagemillError::Api(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&options.base_url)
            .map_err(|e| PagemillError::config(format!("invalid base url '{}': {e}", options.base_url)))?;

        Ok(Self {
            http,
            base_url,
            page_size: options.page_size,
        })
    }

    /// Fetch one page of a block's children.
    #[instrument(skip_all, fields(block_id = %block_id))]
    pub async fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockPage> {
        let mut url = self.endpoint(&format!("v1/blocks/{block_id}/children"))?;
        url.query_pairs_mut()
            .append_pair("page_size", &self.page_size.to_string());
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("start_cursor", cursor);
        }

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PagemillError::Api(format!("{url}: {e}")))?;

        read_json(response, &url).await
    }

    /// Query a database, following the continuation cursor until every entry
    /// has been collected. `query` must be a JSON object (filter/sorts).
    #[instrument(skip_all, fields(database_id = %database_id))]
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &serde_json::Value,
    ) -> Result<Vec<RawPage>> {
        let url = self.endpoint(&format!("v1/databases/{database_id}/query"))?;

        let base_body = query
            .as_object()
            .ok_or_else(|| PagemillError::validation("database query must be a JSON object"))?;

        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = base_body.clone();
            body.insert("page_size".into(), self.page_size.into());
            if let Some(cursor) = &cursor {
                body.insert("start_cursor".into(), cursor.as_str().into());
            }

            let response = self
                .http
                .post(url.clone())
                .json(&body)
                .send()
                .await
                .map_err(|e| PagemillError::Api(format!("{url}: {e}")))?;

            let page: QueryPage = read_json(response, &url).await?;
            results.extend(page.results);

            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(entries = results.len(), "database query complete");
        Ok(results)
    }

    /// Retrieve a database object (property schema).
    #[instrument(skip_all, fields(database_id = %database_id))]
    pub async fn retrieve_database(&self, database_id: &str) -> Result<RawDatabase> {
        let url = self.endpoint(&format!("v1/databases/{database_id}"))?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PagemillError::Api(format!("{url}: {e}")))?;

        read_json(response, &url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PagemillError::validation(format!("invalid endpoint path '{path}': {e}")))
    }
}

#[async_trait]
impl BlockSource for NotionClient {
    async fn fetch_children(&self, block_id: &str, cursor: Option<&str>) -> Result<BlockPage> {
        self.list_block_children(block_id, cursor).await
    }
}

/// Check the status and decode the response body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response, url: &Url) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(PagemillError::Api(format!("{url}: HTTP {status}")));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| PagemillError::decode(format!("{url}: {e}")))
}
