use chrono::Utc;

use super::model::{validate_color, validate_name, Board, CreateBoardPayload, UpdateBoardPayload};
use crate::error::{AtomError, AtomResult};
use crate::store::Repositories;
use crate::tasks::model::{normalize_tags, validate_description};

/// Loads a board and checks that `user_id` owns it.
pub async fn load_owned_board(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<Board> {
    let board = repos
        .boards
        .get_board(board_id)
        .await?
        .ok_or_else(|| AtomError::not_found("Board"))?;

    if board.owner_id != user_id {
        return Err(AtomError::Forbidden("this board belongs to another user".to_string()));
    }
    Ok(board)
}

/// Archived boards are read-only.
pub fn ensure_active(board: &Board) -> AtomResult<()> {
    if board.archived {
        return Err(AtomError::Conflict("board is archived".to_string()));
    }
    Ok(())
}

async fn with_task_count(repos: &Repositories, mut board: Board) -> AtomResult<Board> {
    let count = repos.tasks.count_tasks(&board.board_id).await?;
    board.task_count = u32::try_from(count).unwrap_or(u32::MAX);
    Ok(board)
}

/// The caller's boards, newest first, archived ones only on request.
pub async fn list_boards(repos: &Repositories, user_id: &str, include_archived: bool) -> AtomResult<Vec<Board>> {
    let mut boards = repos.boards.list_boards(user_id).await?;
    boards.retain(|b| include_archived || !b.archived);
    boards.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.board_id.cmp(&b.board_id))
    });

    let mut out = Vec::with_capacity(boards.len());
    for board in boards {
        out.push(with_task_count(repos, board).await?);
    }
    Ok(out)
}

pub async fn get_board(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<Board> {
    let board = load_owned_board(repos, user_id, board_id).await?;
    with_task_count(repos, board).await
}

pub async fn create_board(repos: &Repositories, user_id: &str, payload: CreateBoardPayload) -> AtomResult<Board> {
    let now = Utc::now();
    let board = Board {
        board_id: uuid::Uuid::new_v4().to_string(),
        owner_id: user_id.to_string(),
        name: validate_name(&payload.name)?,
        description: validate_description(payload.description)?,
        color: validate_color(payload.color)?,
        tags: normalize_tags(payload.tags.unwrap_or_default())?,
        task_count: 0,
        archived: false,
        archived_at: None,
        created_at: now,
        updated_at: now,
    };

    repos.boards.put_board(&board).await?;
    tracing::info!(board_id = %board.board_id, user_id, "board created");
    Ok(board)
}

/// Rename, describe, recolor or retag a board.
pub async fn update_board(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    payload: UpdateBoardPayload,
) -> AtomResult<Board> {
    let mut board = load_owned_board(repos, user_id, board_id).await?;
    ensure_active(&board)?;

    if let Some(name) = payload.name {
        board.name = validate_name(&name)?;
    }
    if let Some(description) = payload.description {
        board.description = validate_description(Some(description))?;
    }
    if payload.color.is_some() {
        board.color = validate_color(payload.color)?;
    }
    if let Some(tags) = payload.tags {
        board.tags = normalize_tags(tags)?;
    }
    board.updated_at = Utc::now();

    repos.boards.put_board(&board).await?;
    with_task_count(repos, board).await
}

/// Soft-removes a board from the active list. Archiving twice is harmless.
pub async fn archive_board(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<Board> {
    let mut board = load_owned_board(repos, user_id, board_id).await?;
    if !board.archived {
        let now = Utc::now();
        board.archived = true;
        board.archived_at = Some(now);
        board.updated_at = now;
        repos.boards.put_board(&board).await?;
        tracing::info!(board_id, user_id, "board archived");
    }
    with_task_count(repos, board).await
}

pub async fn restore_board(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<Board> {
    let mut board = load_owned_board(repos, user_id, board_id).await?;
    if board.archived {
        board.archived = false;
        board.archived_at = None;
        board.updated_at = Utc::now();
        repos.boards.put_board(&board).await?;
        tracing::info!(board_id, user_id, "board restored");
    }
    with_task_count(repos, board).await
}
