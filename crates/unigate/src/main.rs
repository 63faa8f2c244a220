mod auth;
mod cli;
mod error;
mod server;

use std::sync::Arc;

use clap::Parser;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use unigate_core::{
    ClientDirectory, ControllerGateway, ControllerSession, LegacyGateway, PpskManager,
};

use crate::cli::Cli;
use crate::error::StartupError;
use crate::server::{AppState, build_router};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    if let Err(err) = run(cli).await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let settings = unigate_config::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", settings.to_redacted_toml()?);
        return Ok(());
    }

    let controller = settings.controller_config()?;
    let mut server = settings.server_config()?;
    if let Some(listen) = cli.listen {
        server.listen = listen;
    }

    if server.bearer_token.expose_secret().is_empty() {
        warn!("API_BEARER_TOKEN is empty; every route except /healthz will answer 401");
    }

    let session = Arc::new(ControllerSession::new(controller));
    let gateway: Arc<dyn ControllerGateway> = Arc::new(LegacyGateway::new(Arc::clone(&session)));
    let state = AppState::new(
        PpskManager::new(Arc::clone(&gateway)),
        ClientDirectory::new(gateway),
        server.bearer_token,
    );

    let listener = TcpListener::bind(server.listen)
        .await
        .map_err(|source| StartupError::Bind {
            addr: server.listen,
            source,
        })?;
    info!(
        listen = %server.listen,
        controller = %session.config().url,
        site = %session.config().site,
        "unigate listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    session.logout().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
    info!("shutdown requested");
}
