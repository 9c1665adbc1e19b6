//! Directed page graph: users -> Talk pages -> articles.
//!
//! Backed by petgraph with a title index so every title maps to exactly one node.

use crate::domain::{PageClass, TalkPageLinks, article_title};
use petgraph::Direction;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;

/// Node payload: the page title and its class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNode {
    pub title: String,
    pub page_class: PageClass,
}

impl std::fmt::Display for PageNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Edge kind, derived from the current classes of both ends.
/// `Discusses`: Talk page -> article; `PostsOn`: user -> Talk page; `Other`: any other pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Discusses,
    PostsOn,
    Other,
}

impl EdgeKind {
    pub fn between(from: PageClass, to: PageClass) -> Self {
        match (from, to) {
            (PageClass::Talk, PageClass::Page) => EdgeKind::Discusses,
            (PageClass::User, PageClass::Talk) => EdgeKind::PostsOn,
            _ => EdgeKind::Other,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EdgeKind::Discusses => "discusses",
            EdgeKind::PostsOn => "posts_on",
            EdgeKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Directed graph keyed by page title. No parallel edges.
#[derive(Debug, Default, Clone)]
pub struct PageGraph {
    graph: DiGraph<PageNode, ()>,
    index: HashMap<String, NodeIndex>,
}

/// Aggregate figures reported after a scrape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphSummary {
    pub talk_pages: usize,
    pub pages: usize,
    pub users: usize,
    pub edges: usize,
    /// (user title, number of Talk pages linked from), most active first.
    pub top_users: Vec<(String, usize)>,
}

impl PageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from Talk titles and parsed Talk page links.
    ///
    /// Adds `talk -> page` for every Talk title, then `user -> talk` for every user link whose
    /// origin Talk page is in the graph. Returns the graph and the number of user links applied
    /// (counted per link occurrence, so archives of the same page count again).
    pub fn build(talk_titles: &[String], talk_links: &[TalkPageLinks]) -> (Self, usize) {
        let mut graph = Self::new();

        for talk in talk_titles {
            let page = article_title(talk);
            graph.upsert_node(talk, PageClass::Talk);
            graph.upsert_node(page, PageClass::Page);
            graph.add_edge(talk, page);
        }

        let mut link_count = 0usize;
        for links in talk_links {
            if !graph.contains(&links.origin_title) {
                continue;
            }
            for user in &links.user_links {
                graph.ensure_node(user, PageClass::User);
                graph.add_edge(user, &links.origin_title);
                link_count += 1;
            }
        }

        (graph, link_count)
    }

    /// Add a node, or overwrite the class of an existing one.
    pub fn upsert_node(&mut self, title: &str, class: PageClass) -> NodeIndex {
        if let Some(&idx) = self.index.get(title) {
            self.graph[idx].page_class = class;
            return idx;
        }
        self.insert(title, class)
    }

    /// Add a node only if the title is not yet present. Returns true when inserted.
    pub fn ensure_node(&mut self, title: &str, class: PageClass) -> bool {
        if self.index.contains_key(title) {
            return false;
        }
        self.insert(title, class);
        true
    }

    fn insert(&mut self, title: &str, class: PageClass) -> NodeIndex {
        let idx = self.graph.add_node(PageNode {
            title: title.to_string(),
            page_class: class,
        });
        self.index.insert(title.to_string(), idx);
        idx
    }

    /// Add a directed edge between two existing nodes. Returns false if either is missing.
    /// Re-adding an existing edge is a no-op.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => {
                self.graph.update_edge(a, b, ());
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }

    pub fn class_of(&self, title: &str) -> Option<PageClass> {
        self.index.get(title).map(|&idx| self.graph[idx].page_class)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &PageNode> {
        self.graph.node_weights()
    }

    /// Edges as (source title, target title, kind), in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, EdgeKind)> {
        self.graph.raw_edges().iter().map(|e| {
            let (from, to) = (&self.graph[e.source()], &self.graph[e.target()]);
            (
                from.title.as_str(),
                to.title.as_str(),
                EdgeKind::between(from.page_class, to.page_class),
            )
        })
    }

    pub fn out_degree(&self, title: &str) -> usize {
        self.index
            .get(title)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Graphviz rendering (labels are titles).
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(|_, node| node.to_string(), |_, _| "");
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }

    /// Per-class counts plus the `top_n` users by out-degree (ties broken by title).
    pub fn summary(&self, top_n: usize) -> GraphSummary {
        let mut summary = GraphSummary {
            edges: self.edge_count(),
            ..GraphSummary::default()
        };
        let mut users = Vec::new();

        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            match node.page_class {
                PageClass::Talk => summary.talk_pages += 1,
                PageClass::Page => summary.pages += 1,
                PageClass::User => {
                    summary.users += 1;
                    let degree = self
                        .graph
                        .neighbors_directed(idx, Direction::Outgoing)
                        .count();
                    users.push((node.title.clone(), degree));
                }
            }
        }

        users.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        users.truncate(top_n);
        summary.top_users = users;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn links(origin: &str, users: &[&str]) -> TalkPageLinks {
        TalkPageLinks {
            origin_title: origin.to_string(),
            user_links: users.iter().map(|u| u.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_build_links_users_to_talk_pages() {
        let titles = vec!["Talk:HIV".to_string(), "Talk:Measles".to_string()];
        let parsed = vec![
            links("Talk:HIV", &["User:A", "User:B"]),
            links("Talk:Measles", &["User:A"]),
        ];

        let (graph, count) = PageGraph::build(&titles, &parsed);

        assert_eq!(count, 3);
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.class_of("Talk:HIV"), Some(PageClass::Talk));
        assert_eq!(graph.class_of("HIV"), Some(PageClass::Page));
        assert_eq!(graph.class_of("User:A"), Some(PageClass::User));
        assert!(graph.has_edge("Talk:HIV", "HIV"));
        assert!(graph.has_edge("User:A", "Talk:Measles"));
        assert!(!graph.has_edge("Talk:Measles", "User:A"));
    }

    #[test]
    fn test_build_counts_archive_links_without_parallel_edges() {
        let titles = vec!["Talk:HIV".to_string()];
        let parsed = vec![
            links("Talk:HIV", &["User:A"]),
            links("Talk:HIV", &["User:A"]), // from Talk:HIV/Archive 1
        ];

        let (graph, count) = PageGraph::build(&titles, &parsed);

        assert_eq!(count, 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.out_degree("User:A"), 1);
    }

    #[test]
    fn test_build_skips_unknown_origins() {
        let titles = vec!["Talk:HIV".to_string()];
        let parsed = vec![links("Talk:Elsewhere", &["User:A"])];

        let (graph, count) = PageGraph::build(&titles, &parsed);

        assert_eq!(count, 0);
        assert!(!graph.contains("User:A"));
    }

    #[test]
    fn test_upsert_overwrites_class_but_ensure_does_not() {
        let mut graph = PageGraph::new();
        graph.upsert_node("X", PageClass::Page);
        assert!(!graph.ensure_node("X", PageClass::User));
        assert_eq!(graph.class_of("X"), Some(PageClass::Page));
        graph.upsert_node("X", PageClass::Talk);
        assert_eq!(graph.class_of("X"), Some(PageClass::Talk));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_requires_both_nodes() {
        let mut graph = PageGraph::new();
        graph.upsert_node("A", PageClass::User);
        assert!(!graph.add_edge("A", "B"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_summary_ranks_users() {
        let titles = vec![
            "Talk:A".to_string(),
            "Talk:B".to_string(),
            "Talk:C".to_string(),
        ];
        let parsed = vec![
            links("Talk:A", &["User:Busy", "User:Quiet"]),
            links("Talk:B", &["User:Busy", "User:Alsoquiet"]),
            links("Talk:C", &["User:Busy"]),
        ];
        let (graph, _) = PageGraph::build(&titles, &parsed);

        let summary = graph.summary(2);

        assert_eq!(summary.talk_pages, 3);
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.users, 3);
        assert_eq!(summary.edges, 8);
        assert_eq!(
            summary.top_users,
            vec![("User:Busy".to_string(), 3), ("User:Alsoquiet".to_string(), 1)]
        );
    }

    #[test]
    fn test_edges_and_dot_use_titles() {
        let (graph, _) = PageGraph::build(&["Talk:A".to_string()], &[]);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![("Talk:A", "A", EdgeKind::Discusses)]);
        assert!(graph.to_dot().contains("Talk:A"));
    }

    #[test]
    fn test_edge_kind_follows_class_changes() {
        let (mut graph, _) = PageGraph::build(&["Talk:A".to_string()], &[]);
        graph.upsert_node("A", PageClass::Talk);
        graph.upsert_node("User:X", PageClass::User);
        assert!(graph.add_edge("User:X", "A"));

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(
            edges,
            vec![
                ("Talk:A", "A", EdgeKind::Other),
                ("User:X", "A", EdgeKind::PostsOn),
            ]
        );
        assert_eq!(EdgeKind::Other.to_string(), "other");
    }
}
