//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when only the REST server (with OpenAPI/Swagger UI) is wanted. The
//! workspace's main `medwell-run` binary serves the same router.

use medwell_core::{
    constants::REPORTS_FILE_ENV, reports_file_from_env_value, PortalConfig, ReportService,
    DEFAULT_EXPORT_DIR,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the MedWell REST API server
///
/// # Environment Variables
/// - `MEDWELL_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEDWELL_REPORTS_FILE`: Report feed JSON file (built-in reports only when unset)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDWELL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = PortalConfig::new(
        reports_file_from_env_value(std::env::var(REPORTS_FILE_ENV).ok()),
        DEFAULT_EXPORT_DIR.into(),
    )?;
    let service = ReportService::load(cfg.report_source().as_ref());

    tracing::info!("-- Starting MedWell REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::router(service)).await?;

    Ok(())
}
