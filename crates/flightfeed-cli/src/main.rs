mod cli;
mod error;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flightfeed_core::{FetchWorker, FlightCatalog, ReqwestTransport, Scheduler};
use flightfeed_store::{FlightStore, MemoryStore, RedisStore};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let sources = cli.sources()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cli.port,
        sources = sources.len(),
        "starting flightfeed"
    );

    let store: Arc<dyn FlightStore> = if cli.memory_store {
        tracing::info!("using in-process flight store");
        Arc::new(MemoryStore::new())
    } else {
        let (host, port) = match (cli.store_host.as_deref(), cli.store_port) {
            (Some(host), Some(port)) => (host, port),
            _ => {
                return Err(CliError::Config(String::from(
                    "store host and port are required unless --memory-store is set",
                )))
            }
        };
        let store = RedisStore::new(host, port);
        tracing::info!(addr = %store.addr(), "using external flight store");
        Arc::new(store)
    };

    // Startup ordering is explicit: the store must be open, and the
    // scheduler reset confirmed, before any task is registered.
    store.open().await?;

    let catalog = FlightCatalog::new(Arc::clone(&store), cli.cache_ttl());
    let transport = Arc::new(ReqwestTransport::new());
    let worker = Arc::new(FetchWorker::with_timeout(
        transport,
        catalog.clone(),
        cli.fetch_timeout(),
    ));
    let mut scheduler = Scheduler::new(worker, cli.scheduler_config());
    scheduler.initialize(&sources).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tokio::select! {
        result = flightfeed_web::serve(addr, catalog) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    scheduler.shutdown().await;
    store.close().await?;
    Ok(())
}
