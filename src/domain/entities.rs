//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here; adapters map into these types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Prefix of titles in the Talk namespace.
pub const TALK_PREFIX: &str = "Talk:";

/// MediaWiki namespace id (e.g. 0 = articles, 1 = Talk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace(pub i32);

impl Namespace {
    pub const MAIN: Namespace = Namespace(0);
    pub const TALK: Namespace = Namespace(1);
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of node in the page graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageClass {
    Talk,
    Page,
    User,
}

impl PageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageClass::Talk => "talk",
            PageClass::Page => "page",
            PageClass::User => "user",
        }
    }
}

impl std::fmt::Display for PageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page listed as a member of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMember {
    pub page_id: i64,
    pub ns: Namespace,
    pub title: String,
}

/// A page with its latest wikitext. `content` is None when the page does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    pub title: String,
    pub content: Option<String>,
}

impl WikiPage {
    pub fn exists(&self) -> bool {
        self.content.is_some()
    }
}

/// User links found on a Talk page (or one of its archives).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkPageLinks {
    /// Talk page the links belong to; archives resolve to their parent page.
    pub origin_title: String,
    /// Distinct `User:` targets, sorted.
    pub user_links: BTreeSet<String>,
}

/// An article page that was fetched successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub origin_title: String,
}

/// Bookkeeping for one scrape run. Persisted next to the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeInfo {
    pub categories: Vec<String>,
    /// Talk pages found in the categories.
    pub titles: Vec<String>,
    /// Archive subpages of those Talk pages.
    pub archive_titles: Vec<String>,
    /// Unix timestamp (seconds) when the scrape finished.
    pub scraped_at: i64,
}

/// Article title for a Talk page: strips a leading `Talk:`.
pub fn article_title(talk_title: &str) -> &str {
    talk_title.strip_prefix(TALK_PREFIX).unwrap_or(talk_title)
}

/// Title prefix used to search archive subpages of a Talk page.
///
/// The prefix is looked up in the Talk namespace, so it carries no `Talk:` itself.
pub fn archive_prefix(talk_title: &str) -> String {
    format!("{}/Archive", article_title(talk_title))
}
