//! Callback Server Binary
//!
//! Usage: `tss-gate [config.yaml]`

use std::env;
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use tss_gate_server::config::{CONFIG_PATH_ENV, LOG_LEVEL_ENV};
use tss_gate_server::{create_router, AppState, Gateway, GatewayConfig};

#[tokio::main]
async fn main() {
    let config_path = GatewayConfig::resolve_path(env::args().nth(1), env::var(CONFIG_PATH_ENV).ok());
    let config = match GatewayConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    // Initialize logging
    let default_level = if config.callback_server.enable_debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let log_level = env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(default_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", err);
        process::exit(1);
    }

    let gateway = match Gateway::from_config(&config) {
        Ok(gateway) => gateway,
        Err(err) => {
            error!(error = %err, "Failed to initialize gateway");
            process::exit(1);
        }
    };

    let service_name = config.callback_server.service_name.clone();
    info!(
        config = %config_path.display(),
        service_name = %service_name,
        token_expire_minutes = config.callback_server.token_expire_minutes,
        handlers = ?gateway.dispatcher().registered_kinds(),
        "Starting callback server"
    );

    let state = Arc::new(AppState { gateway, service_name });
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %addr, error = %err, "Failed to bind to address");
            process::exit(1);
        }
    };

    info!(addr = %addr, "Callback server listening");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "Server error");
        process::exit(1);
    }

    info!("Callback server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
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
