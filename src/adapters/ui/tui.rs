//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Configured categories run straight away; otherwise the user is prompted.

use crate::domain::{DomainError, GraphSummary};
use crate::ports::{GraphRepoPort, InputPort};
use crate::shared::config::split_categories;
use crate::usecases::ScrapeService;
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, Text};
use std::sync::Arc;

/// Neon prompt prefix for all inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("▶").with_fg(Color::LightMagenta))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    scrape_service: Arc<ScrapeService>,
    repo: Arc<dyn GraphRepoPort>,
    categories: Vec<String>,
    top_users: usize,
}

impl TuiInputPort {
    /// `categories`: preconfigured list; empty means prompt at run time.
    pub fn new(
        scrape_service: Arc<ScrapeService>,
        repo: Arc<dyn GraphRepoPort>,
        categories: Vec<String>,
        top_users: usize,
    ) -> Self {
        Self {
            scrape_service,
            repo,
            categories,
            top_users,
        }
    }

    fn prompt_categories() -> Result<Option<Vec<String>>, DomainError> {
        let raw = Text::new("Categories to scrape (separate with |):")
            .with_placeholder("Category:Epidemics|Category:Viral diseases")
            .prompt()
            .map_err(|e| DomainError::Input(e.to_string()))?;
        let categories = split_categories(&raw);
        if categories.is_empty() {
            return Err(DomainError::Input("no categories given".to_string()));
        }

        let go = Confirm::new(&format!("Scrape {} categories?", categories.len()))
            .with_default(true)
            .prompt()
            .map_err(|e| DomainError::Input(e.to_string()))?;
        Ok(go.then_some(categories))
    }
}

/// Plain-text summary printed after a scrape.
pub fn format_summary(summary: &GraphSummary, user_links: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Talk pages: {} | Pages: {} | Users: {} | Edges: {}\n",
        summary.talk_pages, summary.pages, summary.users, summary.edges
    ));
    out.push_str(&format!("Total user links: {}\n", user_links));
    if !summary.top_users.is_empty() {
        out.push_str("Most active users:\n");
        for (i, (user, talk_pages)) in summary.top_users.iter().enumerate() {
            out.push_str(&format!("{:>3}. {} ({} talk pages)\n", i + 1, user, talk_pages));
        }
    }
    out
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let categories = if self.categories.is_empty() {
            match Self::prompt_categories()? {
                Some(c) => c,
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        } else {
            self.categories.clone()
        };

        let (report, paths) = self
            .scrape_service
            .scrape_and_save(&categories, self.repo.as_ref())
            .await?;

        let summary = report.graph.summary(self.top_users);
        println!();
        print!("{}", format_summary(&summary, report.user_link_count));
        for path in paths {
            println!("Saved {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary_lists_top_users() {
        let summary = GraphSummary {
            talk_pages: 2,
            pages: 2,
            users: 1,
            edges: 3,
            top_users: vec![("User:A".to_string(), 2)],
        };
        let text = format_summary(&summary, 4);
        assert!(text.contains("Users: 1"));
        assert!(text.contains("Total user links: 4"));
        assert!(text.contains("1. User:A (2 talk pages)"));
    }
}
