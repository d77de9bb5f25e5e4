use chrono::Utc;

use super::columns::{group_by_status, StatusColumns};
use super::model::{
    non_blank, normalize_tags, validate_description, validate_title, CreateTaskPayload, MoveTaskPayload, Task,
    TaskStatus, UpdateTaskPayload,
};
use super::ordering::plan_move;
use crate::boards::service::{load_owned_board, ensure_active};
use crate::error::{AtomError, AtomResult};
use crate::store::Repositories;

/// Tasks of a board in column order, each column ordered by position.
pub async fn list_tasks(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<Vec<Task>> {
    Ok(load_columns(repos, user_id, board_id).await?.into_tasks())
}

pub async fn load_columns(repos: &Repositories, user_id: &str, board_id: &str) -> AtomResult<StatusColumns> {
    load_owned_board(repos, user_id, board_id).await?;
    let tasks = repos.tasks.list_tasks(board_id).await?;
    Ok(group_by_status(&tasks))
}

pub async fn get_task(repos: &Repositories, user_id: &str, board_id: &str, task_id: &str) -> AtomResult<Task> {
    load_owned_board(repos, user_id, board_id).await?;
    repos
        .tasks
        .get_task(board_id, task_id)
        .await?
        .ok_or_else(|| AtomError::not_found("Task"))
}

/// Creates a task at the bottom of its status column.
pub async fn create_task(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    payload: CreateTaskPayload,
) -> AtomResult<Task> {
    let board = load_owned_board(repos, user_id, board_id).await?;
    ensure_active(&board)?;

    let title = validate_title(&payload.title)?;
    let description = validate_description(payload.description)?;
    let tags = normalize_tags(payload.tags.unwrap_or_default())?;
    let status = payload.status.unwrap_or(TaskStatus::Todo);

    let existing = repos.tasks.list_tasks(board_id).await?;
    let position = next_position(&existing, status);
    let now = Utc::now();

    let task = Task {
        task_id: uuid::Uuid::new_v4().to_string(),
        board_id: board_id.to_string(),
        title,
        description,
        status,
        priority: payload.priority,
        due_date: payload.due_date,
        tags,
        assignee: non_blank(payload.assignee),
        position,
        created_at: now,
        updated_at: now,
    };

    repos.tasks.put_task(&task).await?;
    tracing::info!(board_id, task_id = %task.task_id, status = %task.status, "task created");
    Ok(task)
}

/// Applies edit-form changes. A status change moves the task to the end of
/// its new column and closes the gap it leaves behind, in one write.
pub async fn update_task(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    task_id: &str,
    payload: UpdateTaskPayload,
) -> AtomResult<Task> {
    let board = load_owned_board(repos, user_id, board_id).await?;
    ensure_active(&board)?;

    let mut tasks = repos.tasks.list_tasks(board_id).await?;
    let Some(slot) = tasks.iter().position(|t| t.task_id == task_id) else {
        return Err(AtomError::not_found("Task"));
    };

    let now = Utc::now();
    let edited = &mut tasks[slot];
    if let Some(title) = payload.title {
        edited.title = validate_title(&title)?;
    }
    if let Some(description) = payload.description {
        edited.description = validate_description(Some(description))?;
    }
    if let Some(priority) = payload.priority {
        edited.priority = Some(priority);
    }
    if let Some(due_date) = payload.due_date {
        edited.due_date = Some(due_date);
    }
    if let Some(tags) = payload.tags {
        edited.tags = normalize_tags(tags)?;
    }
    if let Some(assignee) = payload.assignee {
        edited.assignee = non_blank(Some(assignee));
    }
    edited.updated_at = now;
    let edited = edited.clone();

    let new_status = payload.status.filter(|s| *s != edited.status);
    let Some(new_status) = new_status else {
        repos.tasks.put_tasks_atomic(std::slice::from_ref(&edited)).await?;
        return Ok(edited);
    };

    let end = tasks.iter().filter(|t| t.status == new_status).count() as i64;
    let plan = plan_move(&tasks, task_id, new_status, end, now)?;
    repos.tasks.put_tasks_atomic(&plan.changed).await?;
    tracing::info!(board_id, task_id, from = %edited.status, to = %new_status, "task status changed from edit form");
    Ok(plan.task)
}

/// Moves a task to `payload.position` inside the `payload.status` column.
///
/// Every task whose (status, position) changes is written in one atomic
/// step; moving a task onto its own slot writes nothing. See
/// [`plan_move`] for how long columns stay within one transaction.
pub async fn move_task(
    repos: &Repositories,
    user_id: &str,
    board_id: &str,
    task_id: &str,
    payload: MoveTaskPayload,
) -> AtomResult<Task> {
    let board = load_owned_board(repos, user_id, board_id).await?;
    ensure_active(&board)?;

    let tasks = repos.tasks.list_tasks(board_id).await?;
    let plan = plan_move(&tasks, task_id, payload.status, payload.position, Utc::now())?;

    if plan.is_noop() {
        tracing::debug!(board_id, task_id, "move onto own slot ignored");
        return Ok(plan.task);
    }

    repos.tasks.put_tasks_atomic(&plan.changed).await?;
    tracing::info!(
        board_id,
        task_id,
        status = %plan.task.status,
        position = plan.task.position,
        rewritten = plan.changed.len(),
        "task moved"
    );
    Ok(plan.task)
}

fn next_position(tasks: &[Task], status: TaskStatus) -> i64 {
    tasks
        .iter()
        .filter(|t| t.status == status)
        .map(|t| t.position + 1)
        .max()
        .unwrap_or(0)
}
