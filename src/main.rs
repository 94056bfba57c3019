use clap::Parser;
use mimalloc::MiMalloc;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use castor::Trainer;
use castor::config::{Args, Config};
use castor::runner::DemoRunner;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Exit status reported when a shutdown signal interrupts the demo.
const SIGNAL_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let cfg = match Config::load(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        server = %cfg.server,
        database = %cfg.database,
        collection = %cfg.collection,
        rounds = cfg.rounds,
        cycles = ?cfg.cycles,
        pause_max_secs = cfg.pause_max_secs,
        loglevel = %cfg.loglevel
    );

    let client = match castor::db::connect(&cfg.server).await {
        Ok(client) => client,
        Err(e) => {
            error!(server = %cfg.server, error = %e, "could not reach MongoDB");
            return ExitCode::FAILURE;
        }
    };

    let collection = client
        .database(&cfg.database)
        .collection::<Trainer>(&cfg.collection);
    let runner = DemoRunner::new(collection, cfg.demo());

    let code = tokio::select! {
        () = runner.run() => {
            info!("demo run complete");
            ExitCode::SUCCESS
        }
        () = shutdown_signal() => {
            warn!("shutdown signal received, closing the connection");
            ExitCode::from(SIGNAL_EXIT_CODE)
        }
    };

    client.shutdown().await;
    info!("connection closed");
    code
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { /* ... */ },
        _ = terminate => { /* ... */ },
    }
}
