use std::collections::HashMap;

use async_trait::async_trait;

use super::model::{Company, UserCompanyStatus};
use crate::error::AtomResult;

/// Company catalogue persistence.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn put_company(&self, company: &Company) -> AtomResult<()>;

    async fn get_company(&self, company_id: &str) -> AtomResult<Option<Company>>;

    async fn list_companies(&self) -> AtomResult<Vec<Company>>;
}

/// Per-driver pipeline status on companies.
#[async_trait]
pub trait CompanyStatusRepository: Send + Sync {
    async fn put_status(&self, user_id: &str, company_id: &str, status: UserCompanyStatus) -> AtomResult<()>;

    async fn get_status(&self, user_id: &str, company_id: &str) -> AtomResult<Option<UserCompanyStatus>>;

    /// Every status the user has set, keyed by company id.
    async fn list_statuses(&self, user_id: &str) -> AtomResult<HashMap<String, UserCompanyStatus>>;

    /// Removing a status that was never set is not an error.
    async fn delete_status(&self, user_id: &str, company_id: &str) -> AtomResult<()>;
}
