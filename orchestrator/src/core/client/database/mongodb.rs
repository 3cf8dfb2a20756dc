use super::error::DatabaseError;
use crate::core::client::database::constant::{RUN_STATUS_COLLECTION, SCENARIOS_COLLECTION};
use crate::core::client::database::DatabaseClient;
use crate::types::params::database::DatabaseArgs;
use crate::types::run_status::RunStatusItem;
use crate::types::scenario::ScenarioItem;
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions};
use mongodb::{bson, Client, Collection, Database};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

pub trait ToDocument {
    fn to_document(&self) -> Result<Document, DatabaseError>;
}

impl<T: Serialize> ToDocument for T {
    fn to_document(&self) -> Result<Document, DatabaseError> {
        let doc = bson::to_bson(self)?;

        if let Bson::Document(doc) = doc {
            Ok(doc)
        } else {
            Err(DatabaseError::FailedToSerializeDocument(format!("Failed to serialize document: {}", doc)))
        }
    }
}

/// MongoDB client implementation
pub struct MongoDbClient {
    database: Arc<Database>,
}

impl MongoDbClient {
    pub async fn new(config: &DatabaseArgs) -> Result<Self, DatabaseError> {
        let client = Client::with_uri_str(&config.connection_uri).await?;
        let database = Arc::new(client.database(&config.database_name));
        debug!(database = %config.database_name, "Connected to MongoDB");
        Ok(Self { database })
    }

    fn get_scenario_collection(&self) -> Collection<ScenarioItem> {
        self.database.collection(SCENARIOS_COLLECTION)
    }

    fn get_run_status_collection(&self) -> Collection<RunStatusItem> {
        self.database.collection(RUN_STATUS_COLLECTION)
    }
}

#[async_trait]
impl DatabaseClient for MongoDbClient {
    async fn get_scenario_by_name(&self, name: &str) -> Result<Option<ScenarioItem>, DatabaseError> {
        let filter = doc! {
            "name": name
        };
        let scenario = self.get_scenario_collection().find_one(filter, None).await?;
        debug!(scenario = %name, found = scenario.is_some(), "Fetched scenario by name");
        Ok(scenario)
    }

    async fn create_scenario(&self, scenario: ScenarioItem) -> Result<ScenarioItem, DatabaseError> {
        let options = UpdateOptions::builder().upsert(true).build();
        let filter = doc! {
            "name": &scenario.name
        };
        let updates = doc! {
            // only set when the document is inserted for the first time
            "$setOnInsert": scenario.to_document()?
        };

        let result = self.get_scenario_collection().update_one(filter, updates, options).await?;
        if result.matched_count == 0 {
            debug!(scenario = %scenario.name, "Scenario created in MongoDB successfully");
            Ok(scenario)
        } else {
            Err(DatabaseError::ItemAlreadyExists(format!("Scenario already exists with name {}", scenario.name)))
        }
    }

    async fn create_run_status(&self, status: String, scenario_id: Uuid) -> Result<RunStatusItem, DatabaseError> {
        let start = Instant::now();
        let item = RunStatusItem::new(scenario_id, status);
        self.get_run_status_collection().insert_one(&item, None).await?;
        debug!(run_id = %item.id, duration = %start.elapsed().as_millis(), "Run status created in MongoDB successfully");
        Ok(item)
    }

    async fn get_run_status(&self, run_id: Uuid) -> Result<Option<RunStatusItem>, DatabaseError> {
        let filter = doc! {
            "id": run_id
        };
        debug!(run_id = %run_id, "Fetched run status by ID");
        Ok(self.get_run_status_collection().find_one(filter, None).await?)
    }

    async fn update_run_status(&self, current: &RunStatusItem, status: String) -> Result<RunStatusItem, DatabaseError> {
        // Filters to search for the document at the version the caller read
        let filter = doc! {
            "id": current.id,
            "version": current.version,
        };
        let options = FindOneAndUpdateOptions::builder().upsert(false).return_document(ReturnDocument::After).build();

        let update = doc! {
            "$set": {
                "status": status,
                "version": Bson::Int32(current.version + 1),
                "updated_at": Bson::DateTime(Utc::now().round_subsecs(0).into()),
            }
        };

        let result = self.get_run_status_collection().find_one_and_update(filter, update, options).await?;
        match result {
            Some(item) => {
                debug!(run_id = %item.id, version = %item.version, "Run status updated successfully");
                Ok(item)
            }
            None => {
                warn!(run_id = %current.id, version = %current.version, "Failed to update run status. Version is likely outdated");
                Err(DatabaseError::VersionConflict { id: current.id, version: current.version })
            }
        }
    }
}
