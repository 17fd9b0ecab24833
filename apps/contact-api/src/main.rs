//! Contact API Server
//!
//! Accepts contact form submissions and relays them to EmailJS.
//!
//! ## Endpoints
//!
//! - `GET /health` - liveness check
//! - `POST /api/contact` - `{ name, email, organization?, message }`
//!
//! | Outcome                 | Status | Body                                    |
//! |-------------------------|--------|-----------------------------------------|
//! | delivered               | 200    | `{ "success": true }`                   |
//! | blank required field    | 400    | `{ "error": "Missing required fields" }`|
//! | malformed email         | 400    | `{ "error": "Invalid email address" }`  |
//! | anything else           | 500    | `{ "error": "Internal server error" }`  |
//!
//! EmailJS credentials are read once at startup (see `contact_relay`). The
//! server refuses to start when one is missing.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header::CONTENT_TYPE, Method};
use clap::Parser;
use contact_relay::EmailJsConfig;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod error;
mod state;

use state::AppState;

/// Command-line arguments for the contact server
#[derive(Parser, Debug)]
#[command(name = "contact-api")]
#[command(about = "Contact form relay: validates submissions and delivers them through EmailJS")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    let config = EmailJsConfig::from_env().context("EmailJS configuration is incomplete")?;
    info!(
        service_id = %config.service_id,
        template_id = %config.template_id,
        endpoint = %config.endpoint,
        timeout_ms = config.timeout.as_millis() as u64,
        "Loaded EmailJS configuration"
    );

    let state = AppState::new(config)?;

    // The form is served from a different origin than the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Contact API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

fn init_tracing(args: &Args) -> anyhow::Result<()> {
    let level = if args.verbose { "debug" } else { "info" };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("contact_api={level}").parse()?)
        .add_directive(format!("contact_relay={level}").parse()?)
        .add_directive("tower_http=debug".parse()?);

    if args.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_current_span(false)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
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
}
