use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::DriverProfile;
use crate::error::AtomResult;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn put_profile(&self, profile: &DriverProfile) -> AtomResult<()>;

    async fn get_profile(&self, user_id: &str) -> AtomResult<Option<DriverProfile>>;

    /// Records a login without rewriting the rest of the profile.
    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> AtomResult<()>;
}
