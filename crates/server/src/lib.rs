pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod session;
pub mod state;
pub mod types;

use crate::{
    config::{get_config, AppConfig},
    router::create_router,
    session::expire_idle_sessions,
    state::build_app_state,
};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Configures and runs the web server.
///
/// This function initializes the application state, creates the router,
/// and starts the Axum server.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(
        port = config.port,
        knowledge_file = %config.knowledge_file,
        history_file = %config.history_file,
        model = %config.chat.model,
        reveal = config.reveal.enabled,
        session_idle_secs = config.session_idle_secs,
        "Server configuration loaded"
    );

    let session_idle = config.session_idle();
    let app_state = build_app_state(config).await?;
    tokio::spawn(expire_idle_sessions(
        app_state.sessions.clone(),
        session_idle,
        SESSION_SWEEP_PERIOD,
    ));
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// The library's main entry point.
///
/// Sets up logging, configuration, and the TCP listener, then calls `run`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config(None)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    run(listener, config).await
}
