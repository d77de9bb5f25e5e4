use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateVehiclePayload, UpdateVehiclePayload};
use super::service;
use crate::http::{empty_response, error_response, parse_body, respond};
use crate::store::Repositories;

/// GET /api/vehicles
pub async fn list_vehicles_handler(repos: &Repositories, user_id: &str) -> Result<Response<Body>, Error> {
    respond(service::list_vehicles(repos, user_id).await, StatusCode::OK)
}

/// POST /api/vehicles
pub async fn create_vehicle_handler(repos: &Repositories, user_id: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: CreateVehiclePayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(service::create_vehicle(repos, user_id, payload).await, StatusCode::CREATED)
}

/// GET /api/vehicles/{id}
pub async fn get_vehicle_handler(repos: &Repositories, user_id: &str, vehicle_id: &str) -> Result<Response<Body>, Error> {
    respond(service::get_vehicle(repos, user_id, vehicle_id).await, StatusCode::OK)
}

/// PATCH /api/vehicles/{id}
pub async fn update_vehicle_handler(
    repos: &Repositories,
    user_id: &str,
    vehicle_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateVehiclePayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(
        service::update_vehicle(repos, user_id, vehicle_id, payload).await,
        StatusCode::OK,
    )
}

/// DELETE /api/vehicles/{id}
pub async fn delete_vehicle_handler(
    repos: &Repositories,
    user_id: &str,
    vehicle_id: &str,
) -> Result<Response<Body>, Error> {
    match service::delete_vehicle(repos, user_id, vehicle_id).await {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(e) => error_response(&e),
    }
}
