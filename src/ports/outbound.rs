//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{CategoryMember, DomainError, Namespace, PageGraph, ScrapeInfo, WikiPage};
use std::path::PathBuf;

/// MediaWiki API gateway. List category members, search titles, fetch wikitext.
#[async_trait::async_trait]
pub trait WikiGateway: Send + Sync {
    /// All members of `category` in namespace `ns`. Follows continuation until exhausted.
    async fn category_members(
        &self,
        category: &str,
        ns: Namespace,
    ) -> Result<Vec<CategoryMember>, DomainError>;

    /// All titles in namespace `ns` starting with `prefix` (prefix is given without namespace).
    async fn titles_with_prefix(
        &self,
        prefix: &str,
        ns: Namespace,
    ) -> Result<Vec<String>, DomainError>;

    /// Latest wikitext for each title. Missing pages come back with `content: None`.
    ///
    /// Callers keep `titles.len()` within the API's per-request limit (50).
    async fn page_contents(&self, titles: &[String]) -> Result<Vec<WikiPage>, DomainError>;
}

/// Graph repository. Persist a finished graph with its scrape info.
#[async_trait::async_trait]
pub trait GraphRepoPort: Send + Sync {
    /// Write the graph in every supported format. Returns the written paths.
    async fn save_graph(
        &self,
        graph: &PageGraph,
        info: &ScrapeInfo,
    ) -> Result<Vec<PathBuf>, DomainError>;
}

/// Raw page archive. Keeps fetched wikitext for offline reprocessing.
#[async_trait::async_trait]
pub trait PageArchivePort: Send + Sync {
    /// Append pages under the given kind (e.g. "talk", "article").
    async fn save_pages(&self, kind: &str, pages: &[WikiPage]) -> Result<(), DomainError>;
}
