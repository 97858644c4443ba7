//! MongoDB connection and collection access.

use std::time::Duration;

use mongodb::{bson::doc, options::ClientOptions, Client, Collection, Database};

use common::{AppResult, MongoConfig};

/// Shared MongoDB handle; cloning is cheap and shares the driver pool.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect, apply pool bounds and verify with a ping.
    pub async fn connect(config: &MongoConfig) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some(config.app_name.clone());
        options.min_pool_size = Some(config.min_pool_size);
        options.max_pool_size = Some(config.max_pool_size);
        options.max_idle_time = Some(Duration::from_millis(config.max_idle_time_ms));

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        let store = Self { client, database };

        store.ping().await?;
        tracing::info!(database = %config.database, "Connected to MongoDB");

        Ok(store)
    }

    /// Typed handle to a collection in the configured database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Close the driver pool. Other clones of this store stop working.
    pub async fn disconnect(self) {
        self.client.shutdown().await;
        tracing::info!("Disconnected from MongoDB");
    }
}
