use clap::{Parser, Subcommand};

pub mod database;
pub mod kubernetes;
pub mod server;
pub mod service;

#[derive(Parser, Debug)]
#[command(
    name = "chaos-orchestrator",
    about = "Chaos Orchestrator - staged chaos scenarios against Kubernetes workloads",
    long_about = "Chaos Orchestrator loads a named scenario, launches its steps as Kubernetes jobs stage by stage \
    and records every step's status in a versioned run-status document.\n\n\
    Quick Start:\n  \
    chaos-orchestrator run --mongodb-connection-url mongodb://localhost:27017"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the chaos orchestrator service
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct RunCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten)]
    pub kubernetes_args: kubernetes::KubernetesCliArgs,

    #[clap(flatten)]
    pub server_args: server::ServerCliArgs,

    #[clap(flatten)]
    pub service_args: service::ServiceCliArgs,
}
