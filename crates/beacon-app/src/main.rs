mod app;
mod bootstrap;
mod cli;
mod cycle;
mod scheduler;
mod shutdown;
#[cfg(test)]
mod testing;

use std::process::ExitCode;

use beacon_api::PresenceApi;
use beacon_rpc::RpcClient;
use tracing_subscriber::EnvFilter;

use crate::app::Exit;

fn init_logging(log_level: Option<&str>) {
    let directive = log_level
        .map(|level| format!("beacon={level}"))
        .unwrap_or_else(|| "beacon=info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    // Load .env before anything reads the environment or spawns threads
    let dotenv = beacon_config::dotenv::load_first(&beacon_config::dotenv::default_candidates());

    let args = cli::parse();
    init_logging(args.log_level.as_deref());

    tracing::info!("beacon v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let config = match beacon_config::load(args.source.into()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(Exit::ConfigInvalid.code());
        }
    };
    tracing::info!(api_base = %config.api_base, "Config loaded");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let api = PresenceApi::new(&config.api_base);
    let mut rpc = RpcClient::new();
    let exit = runtime.block_on(app::serve(
        &config,
        api,
        &mut rpc,
        args.once,
        shutdown::signal(),
    ));
    ExitCode::from(exit.code())
}
