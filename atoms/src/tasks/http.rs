use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateTaskPayload, MoveTaskPayload, UpdateTaskPayload};
use super::service;
use crate::http::{error_response, parse_body, respond};
use crate::store::Repositories;

/// GET /api/boards/{id}/tasks
pub async fn list_tasks_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
) -> Result<Response<Body>, Error> {
    respond(service::list_tasks(repos, user_id, board_id).await, StatusCode::OK)
}

/// POST /api/boards/{id}/tasks
pub async fn create_task_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateTaskPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(
        service::create_task(repos, user_id, board_id, payload).await,
        StatusCode::CREATED,
    )
}

/// GET /api/boards/{id}/tasks/{tid}
pub async fn get_task_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    respond(service::get_task(repos, user_id, board_id, task_id).await, StatusCode::OK)
}

/// PATCH /api/boards/{id}/tasks/{tid}
pub async fn update_task_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateTaskPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(
        service::update_task(repos, user_id, board_id, task_id, payload).await,
        StatusCode::OK,
    )
}

/// POST /api/boards/{id}/tasks/{tid}/move
pub async fn move_task_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: MoveTaskPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(
        service::move_task(repos, user_id, board_id, task_id, payload).await,
        StatusCode::OK,
    )
}
