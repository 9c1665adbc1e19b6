//! Main scrape logic: categories -> Talk pages -> archives -> wikitext -> graph.
//!
//! - Every stage fans out its API calls with a bounded, order-preserving buffer
//! - Page contents are requested in batches of at most 50 titles (API limit)
//! - Missing pages are skipped; any failed request fails the scrape

use crate::domain::parser::{parse_article_page, parse_talk_page};
use crate::domain::{
    ArticlePage, DomainError, Namespace, PageGraph, ScrapeInfo, TalkPageLinks, WikiPage,
    archive_prefix, article_title,
};
use crate::ports::{GraphRepoPort, PageArchivePort, ProgressPort, WikiGateway};
use crate::shared::config::API_PAGE_REQUEST_LIMIT;
use futures::{StreamExt, TryStreamExt};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Scrape service. Drives the MediaWiki gateway and builds the page graph.
pub struct ScrapeService {
    wiki: Arc<dyn WikiGateway>,
    progress: Arc<dyn ProgressPort>,
    archive: Option<Arc<dyn PageArchivePort>>,
    page_batch_size: usize,
    max_concurrency: usize,
}

/// Result of one scrape run.
#[derive(Debug)]
pub struct ScrapeReport {
    pub graph: PageGraph,
    pub info: ScrapeInfo,
    /// User links applied to the graph, counted per occurrence (archives included).
    pub user_link_count: usize,
    /// Talk pages and archives that existed and were parsed.
    pub talk_pages_parsed: usize,
    pub articles: Vec<ArticlePage>,
}

impl ScrapeService {
    /// # Arguments
    /// * `page_batch_size` - Titles per content request, clamped to 1..=50
    /// * `max_concurrency` - In-flight requests per stage (at least 1)
    pub fn new(
        wiki: Arc<dyn WikiGateway>,
        progress: Arc<dyn ProgressPort>,
        page_batch_size: usize,
        max_concurrency: usize,
    ) -> Self {
        Self {
            wiki,
            progress,
            archive: None,
            page_batch_size: page_batch_size.clamp(1, API_PAGE_REQUEST_LIMIT),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Keep raw wikitext of every fetched page.
    pub fn with_archive(mut self, archive: Arc<dyn PageArchivePort>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Scrape the given categories and build the graph.
    pub async fn scrape(&self, categories: &[String]) -> Result<ScrapeReport, DomainError> {
        // Talk pages in the categories
        let members = self
            .run_stage(
                &format!("Fetching {} categories", categories.len()),
                categories.to_vec(),
                |category| async move {
                    self.wiki
                        .category_members(&category, Namespace::TALK)
                        .await
                },
            )
            .await?;
        let talk_titles: Vec<String> = members
            .into_iter()
            .flatten()
            .map(|m| m.title)
            .collect();
        info!(count = talk_titles.len(), "found Talk pages");

        // Their archive subpages
        let prefixes: Vec<String> = talk_titles.iter().map(|t| archive_prefix(t)).collect();
        let archive_titles: Vec<String> = self
            .run_stage(
                &format!("Fetching {} page archive titles", talk_titles.len()),
                prefixes,
                |prefix| async move {
                    self.wiki
                        .titles_with_prefix(&prefix, Namespace::TALK)
                        .await
                },
            )
            .await?
            .into_iter()
            .flatten()
            .collect();
        info!(count = archive_titles.len(), "found archive pages");

        // Talk + archive wikitext
        let all_talk: Vec<String> = talk_titles
            .iter()
            .chain(archive_titles.iter())
            .cloned()
            .collect();
        let talk_pages = self
            .fetch_pages(&format!("Fetching {} pages", all_talk.len()), &all_talk)
            .await?;
        self.archive_pages("talk", &talk_pages).await;
        let talk_links: Vec<TalkPageLinks> =
            talk_pages.iter().filter_map(parse_talk_page).collect();

        // Article wikitext
        let article_titles: Vec<String> = talk_titles
            .iter()
            .map(|t| article_title(t).to_string())
            .collect();
        let article_pages = self
            .fetch_pages(
                &format!("Fetching {} wiki pages", article_titles.len()),
                &article_titles,
            )
            .await?;
        self.archive_pages("article", &article_pages).await;
        let articles: Vec<ArticlePage> = article_pages
            .iter()
            .filter_map(parse_article_page)
            .collect();

        let (graph, user_link_count) = PageGraph::build(&talk_titles, &talk_links);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            user_links = user_link_count,
            "graph built"
        );

        Ok(ScrapeReport {
            graph,
            info: ScrapeInfo {
                categories: categories.to_vec(),
                titles: talk_titles,
                archive_titles,
                scraped_at: chrono::Utc::now().timestamp(),
            },
            user_link_count,
            talk_pages_parsed: talk_links.len(),
            articles,
        })
    }

    /// Scrape, then persist the graph. Returns the report and the written paths.
    pub async fn scrape_and_save(
        &self,
        categories: &[String],
        repo: &dyn GraphRepoPort,
    ) -> Result<(ScrapeReport, Vec<PathBuf>), DomainError> {
        let report = self.scrape(categories).await?;
        let paths = repo.save_graph(&report.graph, &report.info).await?;
        Ok((report, paths))
    }

    /// Fetch wikitext for `titles` in API-sized batches. Batches keep title order.
    async fn fetch_pages(
        &self,
        label: &str,
        titles: &[String],
    ) -> Result<Vec<WikiPage>, DomainError> {
        let batches: Vec<Vec<String>> = titles
            .chunks(self.page_batch_size)
            .map(<[String]>::to_vec)
            .collect();
        let pages = self
            .run_stage(label, batches, |batch| async move {
                self.wiki.page_contents(&batch).await
            })
            .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// Run `op` over `inputs` with at most `max_concurrency` in flight. Output keeps input order.
    async fn run_stage<I, T, F, Fut>(
        &self,
        label: &str,
        inputs: Vec<I>,
        op: F,
    ) -> Result<Vec<T>, DomainError>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let stage = self.progress.stage(label, inputs.len() as u64);
        let results = futures::stream::iter(inputs.into_iter().map(op))
            .buffered(self.max_concurrency)
            .inspect(|_| stage.inc(1))
            .try_collect::<Vec<T>>()
            .await;
        stage.finish();
        results
    }

    async fn archive_pages(&self, kind: &str, pages: &[WikiPage]) {
        if let Some(archive) = &self.archive {
            if let Err(e) = archive.save_pages(kind, pages).await {
                warn!(kind, error = %e, "failed to archive pages");
            }
        }
    }
}
