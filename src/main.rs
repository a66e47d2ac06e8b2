use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medwell_core::{
    DEFAULT_EXPORT_DIR, PortalConfig, ReportService, constants::REPORTS_FILE_ENV,
    reports_file_from_env_value,
};

/// Main entry point for the MedWell application
///
/// Resolves configuration once, loads the report feed once (falling back to the built-in
/// reports on failure) and serves the REST API on port 3000 (configurable via
/// `MEDWELL_REST_ADDR`).
///
/// # Environment Variables
/// - `MEDWELL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDWELL_REPORTS_FILE`: Report feed JSON file (built-in reports only when unset)
///
/// PDF downloads are rendered in memory, so the server never writes to an export directory.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medwell=info".parse()?)
                .add_directive("medwell_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("MEDWELL_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let cfg = PortalConfig::new(
        reports_file_from_env_value(std::env::var(REPORTS_FILE_ENV).ok()),
        DEFAULT_EXPORT_DIR.into(),
    )?;

    let service = ReportService::load(cfg.report_source().as_ref());
    if let Some(error) = service.load_error() {
        tracing::warn!("Serving built-in reports only: {}", error);
    }

    tracing::info!("++ Starting MedWell REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, api_rest::router(service)).await?;

    Ok(())
}
