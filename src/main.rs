use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filxconnect_admin::auth::IdentityToolkitProvider;
use filxconnect_admin::config::Config;
use filxconnect_admin::web::{self, AppState};

const DEFAULT_LOG_FILTER: &str = "info,filxconnect_admin=debug";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Admin dashboard stopped: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // A missing .env is normal in production.
    dotenvy::dotenv().ok();
    init_logging()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend_url,
        refresh_every_secs = config.refresh_interval.as_secs(),
        page_size = config.table_page_size,
        "FILxCONNECT admin starting"
    );

    let provider = IdentityToolkitProvider::new(&config)
        .context("Failed to build the sign-in provider client")?;
    let state = AppState::new(config, Arc::new(provider))
        .context("Failed to build the backend client")?;

    web::serve(state, wait_for_stop()).await?;
    info!("FILxCONNECT admin stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("Failed to initialize logging")
}

/// Resolves on Ctrl+C or SIGTERM. A signal that cannot be watched is
/// logged and ignored in favour of the other.
async fn wait_for_stop() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot watch for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot watch for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("Ctrl+C received"),
        () = terminate => info!("SIGTERM received"),
    }
}
