//! Implements GraphRepoPort with plain files in one output directory.
//!
//! - `graph.json`: node-link JSON (`directed`, `nodes`, `links`)
//! - `edges.csv`: `source,target,kind`
//! - `graph.dot`: Graphviz
//! - `info.json`: ScrapeInfo

use crate::domain::{DomainError, EdgeKind, PageClass, PageGraph, ScrapeInfo};
use crate::ports::GraphRepoPort;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

#[derive(Serialize)]
struct NodeLinkGraph<'a> {
    directed: bool,
    multigraph: bool,
    nodes: Vec<NodeLinkNode<'a>>,
    links: Vec<NodeLinkEdge<'a>>,
}

#[derive(Serialize)]
struct NodeLinkNode<'a> {
    id: &'a str,
    page_class: PageClass,
}

#[derive(Serialize)]
struct NodeLinkEdge<'a> {
    source: &'a str,
    target: &'a str,
    kind: EdgeKind,
}

/// File-based graph repository.
pub struct GraphFiles {
    output_dir: PathBuf,
}

impl GraphFiles {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Node-link JSON, readable by common graph tooling.
    pub fn node_link_json(graph: &PageGraph) -> Result<String, DomainError> {
        let doc = NodeLinkGraph {
            directed: true,
            multigraph: false,
            nodes: graph
                .nodes()
                .map(|n| NodeLinkNode {
                    id: &n.title,
                    page_class: n.page_class,
                })
                .collect(),
            links: graph
                .edges()
                .map(|(source, target, kind)| NodeLinkEdge {
                    source,
                    target,
                    kind,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&doc).map_err(|e| DomainError::Repo(e.to_string()))
    }

    /// Edge list as CSV with a `source,target,kind` header.
    pub fn edges_csv(graph: &PageGraph) -> Result<String, DomainError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["source", "target", "kind"])
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        for (source, target, kind) in graph.edges() {
            let kind = kind.to_string();
            wtr.write_record([source, target, kind.as_str()])
                .map_err(|e| DomainError::Repo(e.to_string()))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DomainError::Repo(e.to_string()))
    }

    /// Sibling temp file for `path`; keeps the full name so `graph.json` and `graph.dot` differ.
    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }

    /// Atomic save using write-replace: temp file, sync_all, rename.
    async fn write_atomic(path: &Path, contents: &str) -> Result<(), DomainError> {
        let temp_path = Self::temp_path(path);
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(contents.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl GraphRepoPort for GraphFiles {
    async fn save_graph(
        &self,
        graph: &PageGraph,
        info: &ScrapeInfo,
    ) -> Result<Vec<PathBuf>, DomainError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DomainError::Repo(format!("create output dir: {}", e)))?;

        let info_json =
            serde_json::to_string_pretty(info).map_err(|e| DomainError::Repo(e.to_string()))?;
        let outputs = [
            ("graph.json", Self::node_link_json(graph)?),
            ("edges.csv", Self::edges_csv(graph)?),
            ("graph.dot", graph.to_dot()),
            ("info.json", info_json),
        ];

        let mut written = Vec::with_capacity(outputs.len());
        for (name, contents) in outputs {
            let path = self.output_dir.join(name);
            Self::write_atomic(&path, &contents).await?;
            written.push(path);
        }

        info!(
            dir = %self.output_dir.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph saved"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TalkPageLinks;

    fn sample_graph() -> PageGraph {
        let links = TalkPageLinks {
            origin_title: "Talk:HIV".to_string(),
            user_links: ["User:A".to_string()].into_iter().collect(),
        };
        PageGraph::build(&["Talk:HIV".to_string()], &[links]).0
    }

    #[test]
    fn test_node_link_json() {
        let json = GraphFiles::node_link_json(&sample_graph()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["directed"], true);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["nodes"][0]["id"], "Talk:HIV");
        assert_eq!(value["nodes"][0]["page_class"], "talk");
        assert_eq!(value["links"][1]["source"], "User:A");
        assert_eq!(value["links"][1]["kind"], "posts_on");
    }

    #[test]
    fn test_edges_csv() {
        let csv = GraphFiles::edges_csv(&sample_graph()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "source,target,kind");
        assert_eq!(lines[1], "Talk:HIV,HIV,discusses");
        assert_eq!(lines[2], "User:A,Talk:HIV,posts_on");
    }

    #[test]
    fn test_temp_paths_are_distinct_per_file() {
        let dir = Path::new("out");
        let json = GraphFiles::temp_path(&dir.join("graph.json"));
        let dot = GraphFiles::temp_path(&dir.join("graph.dot"));
        assert_eq!(json, dir.join("graph.json.tmp"));
        assert_eq!(dot, dir.join("graph.dot.tmp"));
    }

    #[tokio::test]
    async fn test_save_graph_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = GraphFiles::new(dir.path().join("out"));
        let info = ScrapeInfo {
            categories: vec!["Category:Epidemics".to_string()],
            titles: vec!["Talk:HIV".to_string()],
            ..ScrapeInfo::default()
        };

        let paths = repo.save_graph(&sample_graph(), &info).await.unwrap();

        assert_eq!(paths.len(), 4);
        for p in &paths {
            assert!(p.exists(), "missing {}", p.display());
        }
        let leftovers = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
        let saved: ScrapeInfo = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out/info.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved, info);
    }
}
