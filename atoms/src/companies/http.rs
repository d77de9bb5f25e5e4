use lambda_http::{http::StatusCode, Body, Error, Response};

use super::filter::CompanyQuery;
use super::model::{CreateCompanyPayload, SetCompanyStatusPayload};
use super::service;
use crate::http::{empty_response, error_response, json_response, parse_body, respond};
use crate::store::Repositories;

/// GET /api/companies
pub async fn list_companies_handler(
    repos: &Repositories,
    user_id: Option<&str>,
    query: &CompanyQuery,
) -> Result<Response<Body>, Error> {
    respond(service::list_companies(repos, user_id, query).await, StatusCode::OK)
}

/// GET /api/companies/filters
pub fn filter_options_handler() -> Result<Response<Body>, Error> {
    json_response(StatusCode::OK, &service::filter_options())
}

/// POST /api/companies
pub async fn create_company_handler(repos: &Repositories, user_id: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: CreateCompanyPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(service::create_company(repos, user_id, payload).await, StatusCode::CREATED)
}

/// GET /api/companies/{id}
pub async fn get_company_handler(
    repos: &Repositories,
    user_id: Option<&str>,
    company_id: &str,
) -> Result<Response<Body>, Error> {
    respond(service::get_company(repos, user_id, company_id).await, StatusCode::OK)
}

/// PUT /api/companies/{id}/status
pub async fn set_company_status_handler(
    repos: &Repositories,
    user_id: &str,
    company_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: SetCompanyStatusPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(
        service::set_company_status(repos, user_id, company_id, payload).await,
        StatusCode::OK,
    )
}

/// DELETE /api/companies/{id}/status
pub async fn clear_company_status_handler(
    repos: &Repositories,
    user_id: &str,
    company_id: &str,
) -> Result<Response<Body>, Error> {
    match service::clear_company_status(repos, user_id, company_id).await {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(e) => error_response(&e),
    }
}
