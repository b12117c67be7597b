use clap::Parser;
use pipedesk_core::config::PipedeskConfig;
use pipedesk_core::helpers::clock::SystemClock;
use pipedesk_core::helpers::database::open_store;
use pipedesk_core::integrations::{AppsScriptTarget, HttpCsvSource, PublicSheetClient};
use pipedesk_core::jobs::sync_manager::SyncManager;
use pipedesk_core::CrmStore;
use shared_types::ImportMode;
use spreadsheets::RowMapper;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable cloud sync to this web app URL before starting the timer
    #[arg(long)]
    enable_sync: Option<String>,

    /// Import a public Google Sheet before starting
    #[arg(long)]
    import_sheet: Option<String>,

    /// Keep existing records when importing, adding only unknown ids
    #[arg(long)]
    merge: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("pipedesk.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Load config
    let (config, config_path) = match args.config {
        Some(path) => (PipedeskConfig::load_from(&path)?, path),
        None => PipedeskConfig::load()?,
    };
    tracing::info!("Loaded config from {}", config_path.display());

    let kv = open_store(&config.storage)?;
    let store = CrmStore::new(kv, Arc::new(SystemClock));
    let timeout = Duration::from_secs(config.sheets.request_timeout_secs);

    if let Some(sheet_url) = &args.import_sheet {
        let source = HttpCsvSource::new(timeout)?;
        let client = PublicSheetClient::new(Arc::new(source), config.sheets.tab_gids.clone());
        let report = client.import(sheet_url, &RowMapper::new(store.now())).await?;
        for (source, e) in report.errors() {
            tracing::warn!("Skipped {}: {}", source, e);
        }

        let mode = if args.merge {
            ImportMode::Merge
        } else {
            ImportMode::Replace
        };
        let summary = store.apply_dataset(report.into_dataset(), mode)?;
        tracing::info!(
            "Imported {} records from {} ({} skipped)",
            summary.total_added(),
            sheet_url,
            summary.total_skipped()
        );
    }

    let summary = store.dashboard(config.dashboard.recent_limit)?;
    tracing::info!(
        "{} contacts, {} leads, {} tasks ({} overdue), {} companies",
        summary.total_contacts,
        summary.total_leads,
        summary.total_tasks,
        summary.overdue_tasks,
        summary.total_companies
    );

    let target = AppsScriptTarget::new(timeout)?;
    let sync_manager = SyncManager::new(store.clone(), Arc::new(target));

    let state = sync_manager.initialize().await?;
    tracing::info!("Sync state: {:?}", state);

    // The configured target only applies until sync has been set up once
    let first_run_target = match store.sync_config()? {
        Some(_) => None,
        None => config.sync.target.clone(),
    };
    if let Some(url) = args.enable_sync.or(first_run_target) {
        if let Err(e) = sync_manager.enable(&url, config.sync.interval_minutes).await {
            tracing::warn!("Could not enable sync to {}: {}", url, e);
        }
    }

    tracing::info!("pipedesk running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("Ctrl+C received, shutting down...");
    sync_manager.shutdown().await;
    Ok(())
}
