//! wikara-web - WIKARA survey form and completion dashboard
//!
//! Collects SLS survey submissions into a spreadsheet and shows how much of
//! the reference hierarchy has been covered.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wikara_common::config::{load_toml_config, Overrides, Settings};
use wikara_common::names::load_names;
use wikara_common::reference::reference_source;
use wikara_common::sheets::HttpSheetStore;
use wikara_web::{build_router, AppState};

/// Command-line arguments for wikara-web
#[derive(Parser, Debug)]
#[command(name = "wikara-web")]
#[command(about = "WIKARA survey form and completion dashboard")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "WIKARA_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "WIKARA_BIND")]
    bind: Option<String>,

    /// Spreadsheet export URL
    #[arg(long, env = "WIKARA_SHEET_URL")]
    sheet_url: Option<String>,

    /// Apps-script deployment id used for appends
    #[arg(long, env = "WIKARA_APPS_SCRIPT_ID")]
    apps_script_id: Option<String>,

    /// Reference hierarchy file path or URL
    #[arg(short, long, env = "WIKARA_REFERENCE")]
    reference: Option<String>,

    /// Respondent-name options file
    #[arg(short, long, env = "WIKARA_NAMES")]
    names: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "WIKARA_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind.clone(),
            port: self.port,
            sheet_url: self.sheet_url.clone(),
            apps_script_id: self.apps_script_id.clone(),
            reference: self.reference.clone(),
            names: self.names.clone(),
        }
    }
}

/// Default directives when neither RUST_LOG nor the config sets a level
fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.unwrap_or("info");
        format!(
            "wikara_web={0},wikara_common={0},tower_http={0}",
            level
        )
        .into()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing exists so its log level can apply;
    // problems are reported once the subscriber is up.
    let toml = load_toml_config(args.config.as_deref());
    let level = toml.as_ref().ok().map(|t| t.logging.level.clone());

    tracing_subscriber::registry()
        .with(env_filter(level.as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting WIKARA web (wikara-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml = toml.context("Failed to load configuration")?;
    let settings = Settings::resolve(args.overrides(), toml);

    if settings.sheet_url.is_none() {
        warn!("No sheet export URL configured; the dashboard will show no data");
    }
    if settings.apps_script_id.is_none() {
        warn!("No apps script id configured; submissions will fail");
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("wikara-web/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let store = Arc::new(HttpSheetStore::new(
        client.clone(),
        settings.sheet_url.clone(),
        settings.append_url(),
    ));
    let reference = reference_source(&settings.reference, client);
    info!("Reference hierarchy: {}", reference.location());

    let names = match load_names(&settings.names).await {
        Ok(names) => {
            info!("Loaded {} name options from {}", names.len(), settings.names.display());
            names
        }
        Err(e) => {
            warn!(
                "Failed to load name options from {}: {}",
                settings.names.display(),
                e
            );
            Vec::new()
        }
    };

    let app = build_router(AppState::new(store, reference, names));

    let addr = settings.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("wikara-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
