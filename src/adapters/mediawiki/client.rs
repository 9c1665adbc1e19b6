//! Implements WikiGateway over the MediaWiki Action API (reqwest).
//!
//! - Follows `continue` until a listing is exhausted
//! - Optional fixed delay before every request (rate limiting)
//! - Retries 429/5xx with exponential backoff, honoring `Retry-After`

use crate::adapters::mediawiki::mapper::{
    self, AllPagesQuery, CategoryMembersQuery, QueryResponse, RevisionsQuery,
};
use crate::domain::{CategoryMember, DomainError, Namespace, WikiPage};
use crate::ports::WikiGateway;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for `cmlimit` / `aplimit` for regular clients.
const LIST_LIMIT: &str = "500";

/// Default first backoff step; doubles per retry.
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Longest wait accepted from a `Retry-After` header.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

/// MediaWiki API client.
pub struct MediaWikiClient {
    client: reqwest::Client,
    api_url: String,
    request_delay: Duration,
    max_retries: u32,
    backoff_base: Duration,
}

impl MediaWikiClient {
    /// Create a client for `api_url` (e.g. "https://en.wikipedia.org/w/api.php").
    ///
    /// # Arguments
    /// * `user_agent` - Sent with every request; Wikimedia rejects generic agents
    /// * `request_delay` - Sleep before each request (zero disables)
    /// * `max_retries` - Retries for 429/5xx responses
    pub fn new(
        api_url: impl Into<String>,
        user_agent: &str,
        request_delay: Duration,
        max_retries: u32,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DomainError::Http(format!("build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            request_delay,
            max_retries,
            backoff_base: DEFAULT_BACKOFF_BASE,
        })
    }

    /// Override the first backoff step (tests use a few milliseconds).
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Base parameters of every `action=query` request.
    fn query_params(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut params = vec![
            ("action".to_string(), "query".to_string()),
            ("format".to_string(), "json".to_string()),
        ];
        params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        params
    }

    /// Issue a query and keep following `continue` until the API stops returning it.
    /// `extract` maps each response's `query` object to items; items are concatenated in order.
    async fn query_all<Q, T, F>(
        &self,
        params: Vec<(String, String)>,
        extract: F,
    ) -> Result<Vec<T>, DomainError>
    where
        Q: DeserializeOwned + Send,
        T: Send,
        F: Fn(Q) -> Vec<T> + Send + Sync,
    {
        let mut items = Vec::new();
        let mut continuation: Vec<(String, String)> = Vec::new();

        loop {
            let mut request_params = params.clone();
            request_params.extend(continuation.iter().cloned());

            let response: QueryResponse<Q> = self.get_json(&request_params).await?;
            response.check_error()?;
            let next = response.continuation_params();

            if let Some(query) = response.query {
                items.extend(extract(query));
            }

            if next.is_empty() {
                break;
            }
            if next == continuation {
                warn!(?next, "API repeated the same continuation, stopping");
                break;
            }
            debug!(?next, "following continuation");
            continuation = next;
        }

        Ok(items)
    }

    async fn get_json<Q: DeserializeOwned>(
        &self,
        params: &[(String, String)],
    ) -> Result<Q, DomainError> {
        let body = self.get_with_retry(params).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %body.chars().take(200).collect::<String>(), "JSON parse failed");
            DomainError::Decode(e.to_string())
        })
    }

    async fn get_with_retry(&self, params: &[(String, String)]) -> Result<String, DomainError> {
        let mut attempt = 0u32;

        loop {
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let response = self
                .client
                .get(&self.api_url)
                .query(params)
                .send()
                .await
                .map_err(|e| DomainError::Http(format!("request failed: {}", e)))?;

            let status = response.status();
            if status.is_success() {
                return response
                    .text()
                    .await
                    .map_err(|e| DomainError::Http(format!("read body: {}", e)));
            }

            let retry_after = retry_after(&response);
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

            if retryable && attempt < self.max_retries {
                let wait = retry_after.unwrap_or_else(|| {
                    self.backoff_base
                        .saturating_mul(2u32.saturating_pow(attempt))
                });
                attempt += 1;
                warn!(
                    status = %status,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "retryable API response, backing off"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(DomainError::RateLimited {
                    retry_after_secs: retry_after.map(|d| d.as_secs()).unwrap_or(0),
                });
            }

            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "API returned error");
            return Err(DomainError::Http(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }
    }
}

/// `Retry-After` in seconds, capped at MAX_RETRY_AFTER. HTTP-date values are ignored.
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

#[async_trait::async_trait]
impl WikiGateway for MediaWikiClient {
    async fn category_members(
        &self,
        category: &str,
        ns: Namespace,
    ) -> Result<Vec<CategoryMember>, DomainError> {
        let ns = ns.to_string();
        let params = Self::query_params(&[
            ("list", "categorymembers"),
            ("cmtitle", category),
            ("cmnamespace", ns.as_str()),
            ("cmlimit", LIST_LIMIT),
        ]);
        let members = self
            .query_all::<CategoryMembersQuery, _, _>(params, mapper::category_members_to_domain)
            .await?;
        debug!(category, count = members.len(), "fetched category members");
        Ok(members)
    }

    async fn titles_with_prefix(
        &self,
        prefix: &str,
        ns: Namespace,
    ) -> Result<Vec<String>, DomainError> {
        let ns = ns.to_string();
        let params = Self::query_params(&[
            ("list", "allpages"),
            ("apprefix", prefix),
            ("apnamespace", ns.as_str()),
            ("aplimit", LIST_LIMIT),
        ]);
        self.query_all::<AllPagesQuery, _, _>(params, mapper::all_pages_to_titles)
            .await
    }

    async fn page_contents(&self, titles: &[String]) -> Result<Vec<WikiPage>, DomainError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }
        let joined = titles.join("|");
        let params = Self::query_params(&[
            ("prop", "revisions"),
            ("rvprop", "content"),
            ("rvslots", "*"),
            ("titles", joined.as_str()),
        ]);
        let pages = self
            .query_all::<RevisionsQuery, _, _>(params, mapper::revisions_to_pages)
            .await?;
        // Continued revision queries repeat pages without content.
        let pages = mapper::merge_pages(pages);
        debug!(
            requested = titles.len(),
            returned = pages.len(),
            "fetched page contents"
        );
        Ok(pages)
    }
}
