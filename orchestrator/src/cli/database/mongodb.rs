use clap::Args;

/// Parameters used to connect to the run-status store.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server.
    #[arg(env = "CHAOS_ORCHESTRATOR_MONGODB_CONNECTION_URL", long)]
    pub mongodb_connection_url: String,

    /// The name of the database holding scenarios and run statuses.
    #[arg(env = "CHAOS_ORCHESTRATOR_DATABASE_NAME", long, default_value = "chaos")]
    pub mongodb_database_name: String,
}
