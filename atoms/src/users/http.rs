use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateProfilePayload, UpdateProfilePayload};
use super::service;
use crate::http::{error_response, parse_body, respond};
use crate::store::Repositories;

/// POST /api/users
pub async fn create_profile_handler(repos: &Repositories, user_id: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: CreateProfilePayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(service::create_profile(repos, user_id, payload).await, StatusCode::CREATED)
}

/// GET /api/users/me
pub async fn get_profile_handler(repos: &Repositories, user_id: &str) -> Result<Response<Body>, Error> {
    respond(service::get_profile(repos, user_id).await, StatusCode::OK)
}

/// PATCH /api/users/me
pub async fn update_profile_handler(repos: &Repositories, user_id: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: UpdateProfilePayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(service::update_profile(repos, user_id, payload).await, StatusCode::OK)
}

/// GET /api/users/me/onboarding
pub async fn onboarding_handler(repos: &Repositories, user_id: &str) -> Result<Response<Body>, Error> {
    respond(service::onboarding_progress(repos, user_id).await, StatusCode::OK)
}
