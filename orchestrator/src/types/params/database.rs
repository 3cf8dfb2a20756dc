use crate::cli::database::mongodb::MongoDBCliArgs;

#[derive(Debug, Clone)]
pub struct DatabaseArgs {
    pub connection_uri: String,
    pub database_name: String,
}

impl From<MongoDBCliArgs> for DatabaseArgs {
    fn from(args: MongoDBCliArgs) -> Self {
        Self { connection_uri: args.mongodb_connection_url, database_name: args.mongodb_database_name }
    }
}
