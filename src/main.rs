//! Log Relay - Binary Entry Point
//!
//! Runs a single worker: loads the counter snapshot, serves the admin API,
//! accepts host events on `POST /api/events`, and dumps the snapshot on
//! Ctrl+C / SIGTERM.

use std::sync::mpsc;
use std::sync::Arc;

use log_relay::api::{create_router, AppState};
use log_relay::hooks::LogSink;
use log_relay::{
    EventPipeline, HttpTransport, Interceptor, RelayConfig, RelayResult, SegmentRegistry,
    ShutdownReason, StartupChain,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> RelayResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("{} v{}", log_relay::NAME, log_relay::VERSION);

    let config = RelayConfig::from_env()?;

    // The host's own log output runs ahead of the relay's hooks
    let pipeline = Arc::new(EventPipeline::new());
    pipeline.register(Arc::new(LogSink));

    let transport = Arc::new(HttpTransport::new(config.timeout)?);
    let interceptor = Interceptor::start(
        &config,
        SegmentRegistry::global(),
        &StartupChain::new(),
        Arc::clone(&pipeline),
        transport,
    );

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })?;

    let state = Arc::new(AppState::new(interceptor.query(), pipeline));
    let app = create_router(state);

    let runtime = tokio::runtime::Runtime::new()?;
    let served: RelayResult<()> = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
        info!(addr = %config.http_addr, "admin API listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::task::spawn_blocking(move || stop_rx.recv()).await;
                info!("shutdown requested");
            })
            .await?;
        Ok(())
    });

    let reason = match &served {
        Ok(()) => ShutdownReason::Clean,
        Err(e) => {
            error!(error = %e, "admin API failed");
            ShutdownReason::Abnormal
        }
    };
    interceptor.shutdown(reason);
    served
}
