use async_trait::async_trait;

use super::model::Vehicle;
use crate::error::AtomResult;

/// Vehicle persistence, scoped to the owning driver.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn put_vehicle(&self, vehicle: &Vehicle) -> AtomResult<()>;

    async fn get_vehicle(&self, user_id: &str, vehicle_id: &str) -> AtomResult<Option<Vehicle>>;

    async fn list_vehicles(&self, user_id: &str) -> AtomResult<Vec<Vehicle>>;

    async fn delete_vehicle(&self, user_id: &str, vehicle_id: &str) -> AtomResult<()>;
}
