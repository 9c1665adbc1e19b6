//! Map MediaWiki API JSON to domain entities.
//!
//! Response shapes follow `action=query&format=json` (format version 1).

use crate::domain::{CategoryMember, DomainError, Namespace, WikiPage};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Envelope shared by every `action=query` response.
#[derive(Debug, Deserialize)]
pub struct QueryResponse<Q> {
    pub query: Option<Q>,
    /// Continuation parameters to merge into the next request.
    #[serde(rename = "continue", default)]
    pub continuation: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryMembersQuery {
    #[serde(default)]
    pub categorymembers: Vec<RawCategoryMember>,
}

#[derive(Debug, Deserialize)]
pub struct RawCategoryMember {
    #[serde(default)]
    pub pageid: i64,
    #[serde(default)]
    pub ns: i32,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AllPagesQuery {
    #[serde(default)]
    pub allpages: Vec<RawTitle>,
}

#[derive(Debug, Deserialize)]
pub struct RawTitle {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RevisionsQuery {
    /// Keyed by page id; missing pages get negative ids.
    #[serde(default)]
    pub pages: BTreeMap<String, RawPage>,
}

#[derive(Debug, Deserialize)]
pub struct RawPage {
    pub title: String,
    #[serde(default)]
    pub revisions: Vec<RawRevision>,
}

#[derive(Debug, Deserialize)]
pub struct RawRevision {
    #[serde(default)]
    pub slots: Option<RawSlots>,
    /// Pre-MCR wikis put the content directly on the revision.
    #[serde(rename = "*", default)]
    pub legacy_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSlots {
    pub main: RawSlot,
}

#[derive(Debug, Deserialize)]
pub struct RawSlot {
    #[serde(rename = "*", default)]
    pub content: Option<String>,
}

impl<Q> QueryResponse<Q> {
    /// Turn an API-level error object into a DomainError.
    pub fn check_error(&self) -> Result<(), DomainError> {
        match &self.error {
            Some(e) => Err(DomainError::Api {
                code: e.code.clone(),
                info: e.info.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Continuation parameters as string pairs. Empty when the listing is complete.
    pub fn continuation_params(&self) -> Vec<(String, String)> {
        self.continuation
            .as_ref()
            .map(|m| {
                m.iter()
                    .map(|(k, v)| {
                        let value = match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), value)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn category_members_to_domain(q: CategoryMembersQuery) -> Vec<CategoryMember> {
    q.categorymembers
        .into_iter()
        .map(|m| CategoryMember {
            page_id: m.pageid,
            ns: Namespace(m.ns),
            title: m.title,
        })
        .collect()
}

pub fn all_pages_to_titles(q: AllPagesQuery) -> Vec<String> {
    q.allpages.into_iter().map(|p| p.title).collect()
}

/// Map `prop=revisions` pages. Pages without revisions (missing, invalid) map to `content: None`.
pub fn revisions_to_pages(q: RevisionsQuery) -> Vec<WikiPage> {
    q.pages
        .into_values()
        .map(|page| {
            let content = page.revisions.into_iter().next().and_then(|rev| {
                rev.slots
                    .and_then(|s| s.main.content)
                    .or(rev.legacy_content)
            });
            WikiPage {
                title: page.title,
                content,
            }
        })
        .collect()
}

/// Collapse repeated titles, keeping the first non-empty content. First-seen order is kept.
pub fn merge_pages(pages: Vec<WikiPage>) -> Vec<WikiPage> {
    let mut merged: Vec<WikiPage> = Vec::with_capacity(pages.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(pages.len());
    for page in pages {
        match seen.get(&page.title) {
            Some(&i) => {
                if merged[i].content.is_none() {
                    merged[i].content = page.content;
                }
            }
            None => {
                seen.insert(page.title.clone(), merged.len());
                merged.push(page);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_members_with_continuation() {
        let json = r#"{
            "batchcomplete": "",
            "continue": {"cmcontinue": "page|4849|12345", "continue": "-||"},
            "query": {"categorymembers": [
                {"pageid": 1, "ns": 1, "title": "Talk:HIV"},
                {"pageid": 2, "ns": 1, "title": "Talk:Measles"}
            ]}
        }"#;
        let resp: QueryResponse<CategoryMembersQuery> = serde_json::from_str(json).unwrap();
        assert!(resp.check_error().is_ok());
        assert_eq!(
            resp.continuation_params(),
            vec![
                ("cmcontinue".to_string(), "page|4849|12345".to_string()),
                ("continue".to_string(), "-||".to_string()),
            ]
        );
        let members = category_members_to_domain(resp.query.unwrap());
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].ns, Namespace::TALK);
        assert_eq!(members[1].title, "Talk:Measles");
    }

    #[test]
    fn test_revisions_handle_missing_and_legacy_pages() {
        let json = r#"{"query": {"pages": {
            "-1": {"ns": 1, "title": "Talk:Nope", "missing": ""},
            "10": {"pageid": 10, "ns": 1, "title": "Talk:HIV",
                   "revisions": [{"slots": {"main": {"contentmodel": "wikitext", "*": "hi [[User:A]]"}}}]},
            "11": {"pageid": 11, "ns": 0, "title": "HIV",
                   "revisions": [{"*": "legacy text"}]}
        }}}"#;
        let resp: QueryResponse<RevisionsQuery> = serde_json::from_str(json).unwrap();
        let pages = revisions_to_pages(resp.query.unwrap());
        assert_eq!(pages.len(), 3);
        let by_title = |t: &str| pages.iter().find(|p| p.title == t).unwrap().clone();
        assert!(!by_title("Talk:Nope").exists());
        assert_eq!(by_title("Talk:HIV").content.as_deref(), Some("hi [[User:A]]"));
        assert_eq!(by_title("HIV").content.as_deref(), Some("legacy text"));
    }

    #[test]
    fn test_api_error_maps_to_domain() {
        let json = r#"{"error": {"code": "badvalue", "info": "Unrecognized value"}}"#;
        let resp: QueryResponse<AllPagesQuery> = serde_json::from_str(json).unwrap();
        match resp.check_error() {
            Err(DomainError::Api { code, .. }) => assert_eq!(code, "badvalue"),
            other => panic!("expected Api error, got {:?}", other),
        }
        assert!(resp.continuation_params().is_empty());
    }

    #[test]
    fn test_merge_pages_keeps_content_from_later_batches() {
        let page = |title: &str, content: Option<&str>| WikiPage {
            title: title.to_string(),
            content: content.map(str::to_string),
        };
        let pages = vec![
            page("A", Some("a")),
            page("B", None),
            page("A", None),
            page("B", Some("b")),
        ];
        let merged = merge_pages(pages);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].content.as_deref(), Some("a"));
        assert_eq!(merged[1].content.as_deref(), Some("b"));
    }
}
