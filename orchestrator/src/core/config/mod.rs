use std::sync::Arc;

use crate::cli::RunCmd;
use crate::core::client::{DatabaseClient, KubernetesClient, MongoDbClient, PlatformClient};
use crate::core::error::OrchestratorCoreResult;
use crate::types::params::{DatabaseArgs, KubernetesArgs, ServerParams, ServiceParams};
use crate::OrchestratorResult;

pub struct OrchestratorParams {
    pub kubernetes_config: KubernetesArgs,
    pub service_config: ServiceParams,
    pub server_config: ServerParams,
}

/// The app config. Built once at startup and handed to every component as `Arc<Config>`.
pub struct Config {
    /// The orchestrator config
    orchestrator_params: OrchestratorParams,
    /// The database client
    database: Arc<dyn DatabaseClient>,
    /// The container platform client
    platform: Arc<dyn PlatformClient>,
}

impl Config {
    pub fn new(
        orchestrator_params: OrchestratorParams,
        database: Arc<dyn DatabaseClient>,
        platform: Arc<dyn PlatformClient>,
    ) -> Self {
        Self { orchestrator_params, database, platform }
    }

    /// Setup the orchestrator from the `run` command
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> OrchestratorResult<Self> {
        let db: DatabaseArgs = run_cmd.mongodb_args.clone().into();
        let kubernetes_config: KubernetesArgs = run_cmd.kubernetes_args.clone().into();

        let orchestrator_params = OrchestratorParams {
            service_config: run_cmd.service_args.clone().into(),
            server_config: ServerParams::from(run_cmd.server_args.clone()),
            kubernetes_config,
        };

        let database = Self::build_database_client(&db).await?;
        let platform = Self::build_platform_client(&orchestrator_params.kubernetes_config).await?;

        Ok(Self::new(orchestrator_params, database, platform))
    }

    async fn build_database_client(db_config: &DatabaseArgs) -> OrchestratorCoreResult<Arc<dyn DatabaseClient>> {
        Ok(Arc::new(MongoDbClient::new(db_config).await?))
    }

    async fn build_platform_client(
        kubernetes_config: &KubernetesArgs,
    ) -> OrchestratorCoreResult<Arc<dyn PlatformClient>> {
        Ok(Arc::new(KubernetesClient::new(kubernetes_config).await?))
    }

    /// Returns the namespace chaos workloads are created in
    pub fn job_namespace(&self) -> &str {
        &self.orchestrator_params.kubernetes_config.job_namespace
    }

    /// Returns the server config
    pub fn server_config(&self) -> &ServerParams {
        &self.orchestrator_params.server_config
    }

    /// Returns the service config
    pub fn service_config(&self) -> &ServiceParams {
        &self.orchestrator_params.service_config
    }

    /// Returns the database client
    pub fn database(&self) -> &Arc<dyn DatabaseClient> {
        &self.database
    }

    /// Returns the platform client
    pub fn platform(&self) -> &Arc<dyn PlatformClient> {
        &self.platform
    }
}
