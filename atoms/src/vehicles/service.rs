use chrono::Utc;

use super::model::{
    required_text, validate_vin, validate_year, CreateVehiclePayload, UpdateVehiclePayload, Vehicle, VehicleStatus,
};
use crate::error::{AtomError, AtomResult};
use crate::store::Repositories;
use crate::tasks::model::non_blank;

pub const DEFAULT_VEHICLE_TYPE: &str = "Car";

fn validate_sub_documents(vehicle: &Vehicle) -> AtomResult<()> {
    if let Some(specs) = &vehicle.specifications {
        specs.validate()?;
    }
    if let Some(insurance) = &vehicle.insurance {
        insurance.validate()?;
    }
    if let Some(financing) = &vehicle.financing {
        financing.validate()?;
    }
    Ok(())
}

pub async fn list_vehicles(repos: &Repositories, user_id: &str) -> AtomResult<Vec<Vehicle>> {
    let mut vehicles = repos.vehicles.list_vehicles(user_id).await?;
    vehicles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.vehicle_id.cmp(&b.vehicle_id)));
    Ok(vehicles)
}

pub async fn get_vehicle(repos: &Repositories, user_id: &str, vehicle_id: &str) -> AtomResult<Vehicle> {
    repos
        .vehicles
        .get_vehicle(user_id, vehicle_id)
        .await?
        .ok_or_else(|| AtomError::not_found("Vehicle"))
}

pub async fn create_vehicle(repos: &Repositories, user_id: &str, payload: CreateVehiclePayload) -> AtomResult<Vehicle> {
    let now = Utc::now();
    let vehicle = Vehicle {
        vehicle_id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        make: required_text("make", &payload.make)?,
        model: required_text("model", &payload.model)?,
        year: validate_year(payload.year, now.date_naive())?,
        vehicle_type: non_blank(payload.vehicle_type).unwrap_or_else(|| DEFAULT_VEHICLE_TYPE.to_string()),
        status: payload.status.unwrap_or(VehicleStatus::Active),
        license_plate: non_blank(payload.license_plate).map(|p| p.to_ascii_uppercase()),
        vin: validate_vin(payload.vin)?,
        specifications: payload.specifications,
        insurance: payload.insurance,
        financing: payload.financing,
        created_at: now,
        updated_at: now,
    };
    validate_sub_documents(&vehicle)?;

    repos.vehicles.put_vehicle(&vehicle).await?;
    tracing::info!(vehicle_id = %vehicle.vehicle_id, user_id, "vehicle added");
    Ok(vehicle)
}

/// Partial update. A sub-document that is sent replaces the stored one.
pub async fn update_vehicle(
    repos: &Repositories,
    user_id: &str,
    vehicle_id: &str,
    payload: UpdateVehiclePayload,
) -> AtomResult<Vehicle> {
    let mut vehicle = get_vehicle(repos, user_id, vehicle_id).await?;
    let now = Utc::now();

    if let Some(make) = payload.make {
        vehicle.make = required_text("make", &make)?;
    }
    if let Some(model) = payload.model {
        vehicle.model = required_text("model", &model)?;
    }
    if let Some(year) = payload.year {
        vehicle.year = validate_year(year, now.date_naive())?;
    }
    if let Some(vehicle_type) = non_blank(payload.vehicle_type) {
        vehicle.vehicle_type = vehicle_type;
    }
    if let Some(status) = payload.status {
        vehicle.status = status;
    }
    if let Some(plate) = payload.license_plate {
        vehicle.license_plate = non_blank(Some(plate)).map(|p| p.to_ascii_uppercase());
    }
    if payload.vin.is_some() {
        vehicle.vin = validate_vin(payload.vin)?;
    }
    if payload.specifications.is_some() {
        vehicle.specifications = payload.specifications;
    }
    if payload.insurance.is_some() {
        vehicle.insurance = payload.insurance;
    }
    if payload.financing.is_some() {
        vehicle.financing = payload.financing;
    }
    validate_sub_documents(&vehicle)?;
    vehicle.updated_at = now;

    repos.vehicles.put_vehicle(&vehicle).await?;
    Ok(vehicle)
}

/// Removes a vehicle and unlinks the documents that pointed at it.
pub async fn delete_vehicle(repos: &Repositories, user_id: &str, vehicle_id: &str) -> AtomResult<()> {
    get_vehicle(repos, user_id, vehicle_id).await?;

    let linked = repos.documents.list_documents(user_id).await?;
    for mut doc in linked.into_iter().filter(|d| d.vehicle_id.as_deref() == Some(vehicle_id)) {
        doc.vehicle_id = None;
        doc.updated_at = Utc::now();
        repos.documents.put_document(&doc).await?;
    }

    repos.vehicles.delete_vehicle(user_id, vehicle_id).await?;
    tracing::info!(vehicle_id, user_id, "vehicle removed");
    Ok(())
}
