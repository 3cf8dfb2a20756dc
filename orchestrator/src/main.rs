use chaos_orchestrator::cli::{Cli, Commands, RunCmd};
use chaos_orchestrator::core::config::Config;
use chaos_orchestrator::server::setup_server;
use chaos_orchestrator::utils::logging::init_logging;
use chaos_orchestrator::utils::signal_handler::wait_for_shutdown;
use chaos_orchestrator::worker::coordinator::RunCoordinator;
use chaos_orchestrator::worker::status::status_channel;
use chaos_orchestrator::{OrchestratorError, OrchestratorResult};
use clap::Parser as _;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Start the server
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    init_logging()?;
    info!("Starting chaos orchestrator");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { run_command } => {
            debug!("Executing run command with args: {:?}", run_command);
            if let Err(e) = run_orchestrator(run_command).await {
                error!(error = %e, error_chain = ?e, "Chaos orchestrator stopped with an error");
                return Err(e.into());
            }
            info!("Chaos orchestrator stopped");
        }
    }
    Ok(())
}

async fn run_orchestrator(run_cmd: &RunCmd) -> OrchestratorResult<()> {
    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);
    debug!("Configuration initialized");

    let service = config.service_config();
    let (status_sender, propagator) =
        status_channel(config.database().clone(), service.status_queue_capacity, service.max_status_write_retries);
    let propagator_handle = tokio::spawn(propagator.run());

    let shutdown = CancellationToken::new();
    let coordinator = Arc::new(RunCoordinator::new(config.clone(), status_sender, shutdown.clone()));

    let (address, server_handle) = setup_server(config.clone(), coordinator.clone()).await?;
    info!(address = %address, namespace = %config.job_namespace(), "Chaos orchestrator ready");

    wait_for_shutdown().await.map_err(|e| OrchestratorError::RunCommandError(e.to_string()))?;

    // no new runs past this point
    server_handle.shutdown().await.map_err(|e| OrchestratorError::ServerError(e.to_string()))?;

    // in-flight steps clean up their workloads and report a terminal status
    shutdown.cancel();
    coordinator.wait().await;
    drop(coordinator);

    // the queue closes once the last sender is gone
    propagator_handle.await.map_err(|e| OrchestratorError::RunCommandError(e.to_string()))?;
    Ok(())
}
