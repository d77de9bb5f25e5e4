use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

use driverdesk_atoms::storage::{MemoryObjectStore, ObjectStore, S3ObjectStore, UrlPolicy};
use driverdesk_atoms::Repositories;

use crate::auth::{CognitoVerifier, SessionVerifier};
use crate::config::Config;

/// Everything a request needs, built once per cold start.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repos: Repositories,
    pub objects: Arc<dyn ObjectStore>,
    pub verifier: Arc<dyn SessionVerifier>,
}

impl AppState {
    /// DynamoDB, S3 and Cognito adapters from one SDK config.
    pub fn aws(config: Config, sdk: &SdkConfig) -> Self {
        let repos = Repositories::dynamo(DynamoClient::new(sdk), config.table_name.clone());
        let objects = Arc::new(S3ObjectStore::new(S3Client::new(sdk), config.bucket_name.clone()));
        let verifier = Arc::new(CognitoVerifier::new(CognitoClient::new(sdk)));
        Self {
            config,
            repos,
            objects,
            verifier,
        }
    }

    /// In-memory repositories and object store behind the given verifier.
    pub fn in_memory(config: Config, objects: Arc<MemoryObjectStore>, verifier: Arc<dyn SessionVerifier>) -> Self {
        Self {
            config,
            repos: Repositories::in_memory(),
            objects,
            verifier,
        }
    }

    pub fn url_policy(&self) -> UrlPolicy {
        self.config.url_policy
    }
}
