//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; scraping is delegated to ScrapeService.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use talk_graph::adapters::mediawiki::MediaWikiClient;
use talk_graph::adapters::persistence::{GraphFiles, PageArchive};
use talk_graph::adapters::ui::progress::TerminalProgress;
use talk_graph::adapters::ui::tui::TuiInputPort;
use talk_graph::ports::{GraphRepoPort, InputPort, PageArchivePort, ProgressPort, WikiGateway};
use talk_graph::shared::config::AppConfig;
use talk_graph::usecases::ScrapeService;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    talk_graph::adapters::ui::init_ui();

    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "invalid configuration, using defaults");
            AppConfig::default()
        }
    };

    let output_dir = PathBuf::from(cfg.output_dir_or_default());
    let output_abs = output_dir
        .canonicalize()
        .unwrap_or_else(|_| output_dir.clone());
    info!(path = %output_abs.display(), "output directory");

    // --- MediaWiki gateway (rate limit + retries) ---
    let api_url = cfg.api_url_or_default();
    let request_delay_ms = cfg.request_delay_ms_or_default();
    info!(
        url = %api_url,
        request_delay_ms,
        max_retries = cfg.max_retries_or_default(),
        "MediaWiki API"
    );
    let wiki: Arc<dyn WikiGateway> = Arc::new(
        MediaWikiClient::new(
            api_url,
            &cfg.user_agent_or_default(),
            Duration::from_millis(request_delay_ms),
            cfg.max_retries_or_default(),
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    // --- Persistence ---
    let repo: Arc<dyn GraphRepoPort> = Arc::new(GraphFiles::new(&output_dir));
    let progress: Arc<dyn ProgressPort> = Arc::new(TerminalProgress::new());

    // --- Services ---
    let mut scrape_service = ScrapeService::new(
        wiki,
        progress,
        cfg.page_batch_size_or_default(),
        cfg.max_concurrency_or_default(),
    );
    if cfg.archive_pages_or_default() {
        let pages_dir = output_dir.join("pages");
        info!(path = %pages_dir.display(), "archiving raw wikitext");
        let archive: Arc<dyn PageArchivePort> = Arc::new(PageArchive::new(pages_dir));
        scrape_service = scrape_service.with_archive(archive);
    }
    let scrape_service = Arc::new(scrape_service);

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        scrape_service,
        repo,
        cfg.categories_list(),
        cfg.top_users_or_default(),
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
