//! Pomodoro Desk - a pomodoro timer, task list and shopping list
//! 
//! This is the main entry point for the pomodoro-desk server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_desk::{
    config::Config,
    state::AppState,
    api::create_router,
    services::JsonFileStore,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_desk={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-desk server v{}", env!("CARGO_PKG_VERSION"));
    let durations = config.initial_durations();
    info!("Configuration: host={}, port={}, work={}min, break={}min",
          config.host, config.port,
          durations.get(pomodoro_desk::PhaseKind::Work),
          durations.get(pomodoro_desk::PhaseKind::ShortBreak));

    // List storage lives on disk; the timer itself is never persisted
    let data_dir = config.storage_dir();
    let store = Arc::new(JsonFileStore::new(&data_dir)?);
    info!("Storing lists in {}", data_dir.display());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        durations,
        store,
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /pomodoro               - Timer snapshot");
    info!("  POST /pomodoro/toggle        - Start or pause the timer");
    info!("  POST /pomodoro/reset         - Restart from a fresh work phase");
    info!("  POST /pomodoro/mode/:phase   - Switch to work or shortBreak");
    info!("  POST /pomodoro/adjust        - Change the current phase length");
    info!("  GET  /pomodoro/events        - Stream timer snapshots");
    info!("  GET  /todos, /groceries      - List snapshots");
    info!("  POST /tab/:name              - Switch the active tab");
    info!("  GET  /health                 - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
