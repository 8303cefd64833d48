mod assistant;
mod config;
mod db;
mod errors;
mod export;
mod form;
mod llm_client;
mod metrics;
mod models;
mod pages;
mod routes;
mod state;
mod uploads;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::load_system_prompt;
use crate::config::Config;
use crate::export::PdfClient;
use crate::llm_client::{ChatBackend, LlmClient};
use crate::metrics::{store, CounterService, Counters};
use crate::routes::build_router;
use crate::state::AppState;
use crate::uploads::AvatarStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume builder v{}", env!("CARGO_PKG_VERSION"));
    info!(
        import = config.features.enable_import,
        ai_assistant = config.features.enable_ai_assistant,
        template_selection = config.features.enable_template_selection,
        "Feature flags"
    );

    // Counters: in memory, mirrored to PostgreSQL when DATABASE_URL is set
    let counters = match &config.database_url {
        Some(url) => {
            let pool = store::setup(url).await?;
            let notify = Arc::new(Notify::new());
            let counters = Counters::mirrored(Arc::clone(&notify));
            store::spawn_mirror(pool, counters.clone(), notify);
            info!("Metrics persistence enabled");
            counters
        }
        None => {
            info!("DATABASE_URL not set; counters are in-memory only");
            Counters::in_memory()
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(&config.ai)?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("DEEPSEEK_API_KEY not set; AI endpoints will answer 400");
    }
    let assistant_prompt = load_system_prompt(&config.ai.prompt_path).await;

    let pdf = PdfClient::new(&config.pdf)?;
    if !pdf.is_configured() {
        warn!("PDF_API_URL / PDF_API_KEY not set; PDF export disabled");
    }

    let avatars = AvatarStore::new(config.uploads_dir());
    info!("Avatar uploads stored in {}", avatars.dir().display());

    let metrics: Arc<dyn CounterService> = Arc::new(counters);
    let state = AppState {
        metrics,
        assistant: Arc::new(llm),
        assistant_prompt: Arc::from(assistant_prompt),
        pdf,
        avatars,
        config: config.clone(),
    };

    let app = build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler failed: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler failed: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
