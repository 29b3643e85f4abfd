//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryDataService;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoDataService;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::core::DataService;
use crate::entities::{
    Booking, Document, FinancialTransaction, PurchaseOrder, Quotation, SalesOrder, User, Vehicle,
};
use anyhow::Result;
use std::sync::Arc;

/// One data service per entity type
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn DataService<User>>,
    pub vehicles: Arc<dyn DataService<Vehicle>>,
    pub bookings: Arc<dyn DataService<Booking>>,
    pub quotations: Arc<dyn DataService<Quotation>>,
    pub sales_orders: Arc<dyn DataService<SalesOrder>>,
    pub purchase_orders: Arc<dyn DataService<PurchaseOrder>>,
    pub transactions: Arc<dyn DataService<FinancialTransaction>>,
    pub documents: Arc<dyn DataService<Document>>,
}

impl Stores {
    /// Fresh in-process storage
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryDataService::<User>::new()),
            vehicles: Arc::new(InMemoryDataService::<Vehicle>::new()),
            bookings: Arc::new(InMemoryDataService::<Booking>::new()),
            quotations: Arc::new(InMemoryDataService::<Quotation>::new()),
            sales_orders: Arc::new(InMemoryDataService::<SalesOrder>::new()),
            purchase_orders: Arc::new(InMemoryDataService::<PurchaseOrder>::new()),
            transactions: Arc::new(InMemoryDataService::<FinancialTransaction>::new()),
            documents: Arc::new(InMemoryDataService::<Document>::new()),
        }
    }

    /// Collections of one MongoDB database
    #[cfg(feature = "mongodb_backend")]
    pub fn mongodb(database: ::mongodb::Database) -> Self {
        Self {
            users: Arc::new(MongoDataService::<User>::new(database.clone())),
            vehicles: Arc::new(MongoDataService::<Vehicle>::new(database.clone())),
            bookings: Arc::new(MongoDataService::<Booking>::new(database.clone())),
            quotations: Arc::new(MongoDataService::<Quotation>::new(database.clone())),
            sales_orders: Arc::new(MongoDataService::<SalesOrder>::new(database.clone())),
            purchase_orders: Arc::new(MongoDataService::<PurchaseOrder>::new(database.clone())),
            transactions: Arc::new(MongoDataService::<FinancialTransaction>::new(
                database.clone(),
            )),
            documents: Arc::new(MongoDataService::<Document>::new(database)),
        }
    }

    /// Unique keys, plus the foreign keys the services search on
    #[cfg(feature = "mongodb_backend")]
    pub async fn ensure_mongodb_indexes(database: &::mongodb::Database) -> Result<()> {
        let users = MongoDataService::<User>::new(database.clone());
        users.ensure_unique_index("email").await?;
        users.ensure_indexes(&["role", "vendor_id"]).await?;
        let vehicles = MongoDataService::<Vehicle>::new(database.clone());
        vehicles.ensure_unique_index("registration_number").await?;
        vehicles.ensure_indexes(&["vendor_id"]).await?;
        MongoDataService::<Booking>::new(database.clone())
            .ensure_indexes(&["customer_id", "vendor_id", "driver_id"])
            .await?;
        MongoDataService::<Quotation>::new(database.clone())
            .ensure_indexes(&["booking_id", "customer_id"])
            .await?;
        MongoDataService::<SalesOrder>::new(database.clone())
            .ensure_indexes(&["booking_id", "customer_id"])
            .await?;
        MongoDataService::<PurchaseOrder>::new(database.clone())
            .ensure_indexes(&["sales_order_id", "booking_id", "vendor_id"])
            .await?;
        MongoDataService::<FinancialTransaction>::new(database.clone())
            .ensure_indexes(&["booking_id", "counterparty_id", "sales_order_id"])
            .await?;
        MongoDataService::<Document>::new(database.clone())
            .ensure_indexes(&["booking_id"])
            .await?;
        Ok(())
    }

    /// Open the backend named in the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            DatabaseBackend::InMemory => {
                tracing::info!("using in-memory storage");
                Ok(Self::in_memory())
            }
            #[cfg(feature = "mongodb_backend")]
            DatabaseBackend::Mongodb => {
                let uri = config
                    .uri
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("database.uri is required for mongodb"))?;
                let client = ::mongodb::Client::with_uri_str(uri).await.map_err(|e| {
                    crate::core::error::StorageError::ConnectionError {
                        backend: "MongoDB".to_string(),
                        message: e.to_string(),
                    }
                })?;
                let database = client.database(&config.name);
                Self::ensure_mongodb_indexes(&database).await?;
                tracing::info!(database = %config.name, "connected to MongoDB");
                Ok(Self::mongodb(database))
            }
            #[cfg(not(feature = "mongodb_backend"))]
            DatabaseBackend::Mongodb => Err(anyhow::anyhow!(
                "database.backend is mongodb but the binary was built without the mongodb_backend feature"
            )),
        }
    }
}
