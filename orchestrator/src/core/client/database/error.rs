use mongodb::bson;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Failed to serialize bson: {0}")]
    BsonSerializationError(#[from] bson::ser::Error),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),

    #[error("Item already exists: {0}")]
    ItemAlreadyExists(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    /// The stored document moved past the version the caller read
    #[error("Version conflict on {id}: expected version {version}")]
    VersionConflict { id: Uuid, version: i32 },
}
