use crate::{
    config::Config,
    database::{TransactionStore, entities::NewTransaction},
    server::Server,
};
use std::sync::Arc;

/// Test server builder for creating test instances with configurable backends
pub struct TestServerBuilder {
    config: Config,
    store: Option<Arc<dyn TransactionStore>>,
    records: Vec<NewTransaction>,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            store: None,
            records: Vec::new(),
        }
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Serve from the given store instead of a migrated in-memory SQLite database
    pub fn with_store(mut self, store: Arc<dyn TransactionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Records inserted into the store before the server is returned
    pub fn with_records(mut self, records: Vec<NewTransaction>) -> Self {
        self.records = records;
        self
    }

    /// Build the test server with configured settings
    pub async fn build(self) -> Server {
        let mut config = self.config;
        config.logging.log_request = false;

        let server = match self.store {
            Some(store) => Server::with_store(config, store).await,
            None => {
                config.database.url = "sqlite::memory:".to_string();
                let server = Server::new(config)
                    .await
                    .expect("Failed to create test server");
                if let Some(database) = &server.database {
                    database
                        .migrate()
                        .await
                        .expect("Failed to migrate test database");
                }
                server
            }
        };

        if !self.records.is_empty() {
            server
                .dashboard
                .store()
                .insert_many(&self.records)
                .await
                .expect("Failed to seed test records");
        }

        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
