//! Wikitext parsing. Extracts user links from Talk pages.
//!
//! Works on raw wikitext only; no markup rendering.

use crate::domain::{ArticlePage, TalkPageLinks, WikiPage};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\t ]+").expect("valid whitespace regex"));

/// `[[User:Name]]` or `[[User:Name|label]]`. Subpage links (`User:Name/...`) do not match.
static USER_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(User:[^/\]\[|]+)[\]|]").expect("valid user link regex")
});

/// Collapse runs of newlines, tabs and spaces into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Distinct `User:` link targets in `text`, sorted.
pub fn extract_user_links(text: &str) -> BTreeSet<String> {
    USER_LINK_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Root page of a subpage title: `Talk:HIV/Archive 3` -> `Talk:HIV`.
pub fn origin_title(title: &str) -> &str {
    title
        .split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(title)
}

/// Parse a Talk page (or archive). Returns None for pages that do not exist.
pub fn parse_talk_page(page: &WikiPage) -> Option<TalkPageLinks> {
    let content = page.content.as_deref()?;
    let content = normalize_whitespace(content);
    Some(TalkPageLinks {
        origin_title: origin_title(&page.title).to_string(),
        user_links: extract_user_links(&content),
    })
}

/// Parse an article page. Returns None for pages that do not exist.
pub fn parse_article_page(page: &WikiPage) -> Option<ArticlePage> {
    page.content.as_ref()?;
    Some(ArticlePage {
        origin_title: page.title.clone(),
    })
}
