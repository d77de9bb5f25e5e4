use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateBoardPayload, UpdateBoardPayload};
use super::service;
use crate::http::{error_response, parse_body, respond};
use crate::store::Repositories;

/// GET /api/boards
pub async fn list_boards_handler(
    repos: &Repositories,
    user_id: &str,
    include_archived: bool,
) -> Result<Response<Body>, Error> {
    respond(service::list_boards(repos, user_id, include_archived).await, StatusCode::OK)
}

/// POST /api/boards
pub async fn create_board_handler(repos: &Repositories, user_id: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: CreateBoardPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(service::create_board(repos, user_id, payload).await, StatusCode::CREATED)
}

/// GET /api/boards/{id}
pub async fn get_board_handler(repos: &Repositories, user_id: &str, board_id: &str) -> Result<Response<Body>, Error> {
    respond(service::get_board(repos, user_id, board_id).await, StatusCode::OK)
}

/// PATCH /api/boards/{id}
pub async fn update_board_handler(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateBoardPayload = match parse_body(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    respond(service::update_board(repos, user_id, board_id, payload).await, StatusCode::OK)
}

/// POST /api/boards/{id}/archive
pub async fn archive_board_handler(repos: &Repositories, user_id: &str, board_id: &str) -> Result<Response<Body>, Error> {
    respond(service::archive_board(repos, user_id, board_id).await, StatusCode::OK)
}

/// POST /api/boards/{id}/restore
pub async fn restore_board_handler(repos: &Repositories, user_id: &str, board_id: &str) -> Result<Response<Body>, Error> {
    respond(service::restore_board(repos, user_id, board_id).await, StatusCode::OK)
}
