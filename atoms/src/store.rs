use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoClient;

use crate::boards::repository::BoardRepository;
use crate::companies::repository::{CompanyRepository, CompanyStatusRepository};
use crate::documents::repository::DocumentRepository;
use crate::dynamo::DynamoStore;
use crate::memory::MemoryStore;
use crate::tasks::repository::TaskRepository;
use crate::users::repository::ProfileRepository;
use crate::vehicles::repository::VehicleRepository;

/// One handle per repository port, passed to every service call.
#[derive(Clone)]
pub struct Repositories {
    pub boards: Arc<dyn BoardRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub company_statuses: Arc<dyn CompanyStatusRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Repositories {
    /// Every port backed by the same DynamoDB table.
    pub fn dynamo(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self::shared(Arc::new(DynamoStore::new(client, table_name)))
    }

    /// Every port backed by one fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::shared(Arc::new(MemoryStore::new()))
    }

    fn shared<S>(store: Arc<S>) -> Self
    where
        S: BoardRepository
            + TaskRepository
            + CompanyRepository
            + CompanyStatusRepository
            + DocumentRepository
            + VehicleRepository
            + ProfileRepository
            + 'static,
    {
        Self {
            boards: store.clone(),
            tasks: store.clone(),
            companies: store.clone(),
            company_statuses: store.clone(),
            documents: store.clone(),
            vehicles: store.clone(),
            profiles: store,
        }
    }
}
