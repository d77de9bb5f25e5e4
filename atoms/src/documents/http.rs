use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{DocumentFilter, UpdateDocumentPayload, UploadSlotRequest};
use super::service;
use crate::http::{empty_response, error_response, parse_body, respond};
use crate::storage::{ObjectStore, UrlPolicy};
use crate::store::Repositories;

/// POST /api/documents/upload-url
pub async fn upload_url_handler(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    policy: &UrlPolicy,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let request: UploadSlotRequest = match parse_body(body) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    respond(
        service::request_upload_slot(repos, objects, policy, user_id, request).await,
        StatusCode::OK,
    )
}

/// GET /api/documents
pub async fn list_documents_handler(
    repos: &Repositories,
    user_id: &str,
    filter: &DocumentFilter,
) -> Result<Response<Body>, Error> {
    respond(service::list_documents(repos, user_id, filter).await, StatusCode::OK)
}

/// GET /api/documents/{id}
pub async fn get_document_handler(repos: &Repositories, user_id: &str, document_id: &str) -> Result<Response<Body>, Error> {
    respond(service::get_document(repos, user_id, document_id).await, StatusCode::OK)
}

/// PATCH /api/documents/{id}
pub async fn update_document_handler(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    user_id: &str,
    document_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateDocumentPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(
        service::update_document(repos, objects, user_id, document_id, payload).await,
        StatusCode::OK,
    )
}

/// GET /api/documents/{id}/view-url
pub async fn view_url_handler(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    policy: &UrlPolicy,
    user_id: &str,
    document_id: &str,
) -> Result<Response<Body>, Error> {
    respond(
        service::view_url(repos, objects, policy, user_id, document_id).await,
        StatusCode::OK,
    )
}

/// GET /api/documents/{id}/download-url
pub async fn download_url_handler(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    policy: &UrlPolicy,
    user_id: &str,
    document_id: &str,
) -> Result<Response<Body>, Error> {
    respond(
        service::download_url(repos, objects, policy, user_id, document_id).await,
        StatusCode::OK,
    )
}

/// DELETE /api/documents/{id}
pub async fn delete_document_handler(
    repos: &Repositories,
    objects: &dyn ObjectStore,
    user_id: &str,
    document_id: &str,
) -> Result<Response<Body>, Error> {
    match service::delete_document(repos, objects, user_id, document_id).await {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(e) => error_response(&e),
    }
}
