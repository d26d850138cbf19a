//! session-clock - A 25+5 session/break countdown clock
//!
//! This is the main entry point for the session-clock server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use session_clock::{
    api::create_router,
    config::Config,
    services::check_alert_sound,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("session_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting session-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_millis);

    // The alert is best effort, so a missing sound only warrants a warning
    if let Some(sound) = &config.sound {
        if let Err(e) = check_alert_sound(sound).await {
            warn!("{}", e);
        }
    }

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval(),
        config.alert_player(),
    ));

    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /break/increment   - Lengthen the break");
    info!("  POST /break/decrement   - Shorten the break");
    info!("  POST /session/increment - Lengthen the session");
    info!("  POST /session/decrement - Shorten the session");
    info!("  POST /start_stop        - Start or pause the countdown");
    info!("  POST /reset             - Restore the default 25+5 clock");
    info!("  GET  /status            - Current clock and server status");
    info!("  GET  /events            - Server-sent clock updates");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
