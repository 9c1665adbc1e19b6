//! Implements PageArchivePort. Saves fetched pages as JSON Lines (JSONL).
//! One file per kind: {base_dir}/{kind}.jsonl. Append-only writes.

use crate::domain::{DomainError, WikiPage};
use crate::ports::PageArchivePort;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// File-system page archive. One JSON object per line.
pub struct PageArchive {
    base_dir: std::path::PathBuf,
}

impl PageArchive {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn kind_path(&self, kind: &str) -> std::path::PathBuf {
        self.base_dir.join(format!("{}.jsonl", kind))
    }

    /// Read back every page archived under `kind`. Malformed lines are skipped.
    pub async fn load_pages(&self, kind: &str) -> Result<Vec<WikiPage>, DomainError> {
        let path = self.kind_path(kind);
        let text = match fs::read_to_string(&path).await {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(DomainError::Repo(e.to_string())),
        };
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|l| serde_json::from_str::<WikiPage>(l).ok())
            .collect())
    }
}

#[async_trait::async_trait]
impl PageArchivePort for PageArchive {
    /// Appends pages as one JSON object per line. Does not read the existing file.
    async fn save_pages(&self, kind: &str, pages: &[WikiPage]) -> Result<(), DomainError> {
        if pages.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let path = self.kind_path(kind);
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        for page in pages {
            let line = serde_json::to_string(page).map_err(|e| DomainError::Repo(e.to_string()))?;
            f.write_all(line.as_bytes())
                .await
                .map_err(|e| DomainError::Repo(e.to_string()))?;
            f.write_all(b"\n")
                .await
                .map_err(|e| DomainError::Repo(e.to_string()))?;
        }
        f.flush()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        info!(
            path = %path.display(),
            kind,
            count = pages.len(),
            "archived pages (JSONL)"
        );
        Ok(())
    }
}
