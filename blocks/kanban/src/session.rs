//! Client-side board session with optimistic moves.
//!
//! A drop is applied to the local view first, then sent to the API. On
//! failure the view snaps back to the last server-confirmed state; on success
//! the board's cached queries are invalidated and refetched, so the view ends
//! up equal to what the server stored.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use driverdesk_atoms::error::AtomResult;
use driverdesk_atoms::tasks::{self, group_by_status, plan_move, MoveTaskPayload, StatusColumns, Task};
use driverdesk_atoms::Repositories;

use crate::cache::{board_tag, board_tasks_key, QueryCache};
use crate::drag::MoveCommand;

/// The slice of the API a board session talks to.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_tasks(&self, board_id: &str) -> AtomResult<Vec<Task>>;

    async fn move_task(&self, board_id: &str, task_id: &str, payload: MoveTaskPayload) -> AtomResult<Task>;
}

/// Calls the task services directly on behalf of one user.
#[derive(Clone)]
pub struct ServiceBoardApi {
    repos: Arc<Repositories>,
    user_id: String,
}

impl ServiceBoardApi {
    pub fn new(repos: Arc<Repositories>, user_id: impl Into<String>) -> Self {
        Self {
            repos,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl BoardApi for ServiceBoardApi {
    async fn list_tasks(&self, board_id: &str) -> AtomResult<Vec<Task>> {
        tasks::service::list_tasks(&self.repos, &self.user_id, board_id).await
    }

    async fn move_task(&self, board_id: &str, task_id: &str, payload: MoveTaskPayload) -> AtomResult<Task> {
        tasks::service::move_task(&self.repos, &self.user_id, board_id, task_id, payload).await
    }
}

pub struct BoardSession<A> {
    api: A,
    board_id: String,
    /// Last task list the server returned.
    confirmed: Vec<Task>,
    view: StatusColumns,
    cache: QueryCache<Vec<Task>>,
}

impl<A: BoardApi> BoardSession<A> {
    pub fn new(api: A, board_id: impl Into<String>) -> Self {
        Self {
            api,
            board_id: board_id.into(),
            confirmed: Vec::new(),
            view: StatusColumns::default(),
            cache: QueryCache::new(),
        }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// What the board currently shows, optimistic edits included.
    pub fn columns(&self) -> &StatusColumns {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Loads the task list, from cache when it is still valid.
    pub async fn load(&mut self) -> AtomResult<&StatusColumns> {
        let key = board_tasks_key(&self.board_id);
        let tasks = match self.cache.get(&key) {
            Some(tasks) => tasks,
            None => {
                let tasks = self.api.list_tasks(&self.board_id).await?;
                self.cache.insert(key, tasks.clone(), &[&board_tag(&self.board_id)]);
                tasks
            }
        };
        self.view = group_by_status(&tasks);
        self.confirmed = tasks;
        Ok(&self.view)
    }

    /// Applies a drop locally, then persists it.
    ///
    /// On error the view is restored to the confirmed state and the error is
    /// returned for the caller to surface.
    pub async fn apply_move(&mut self, command: &MoveCommand) -> AtomResult<Task> {
        let plan = plan_move(&self.confirmed, &command.task_id, command.status, command.position, Utc::now())?;
        if plan.is_noop() {
            return Ok(plan.task);
        }

        let mut optimistic = self.confirmed.clone();
        for changed in &plan.changed {
            if let Some(slot) = optimistic.iter_mut().find(|t| t.task_id == changed.task_id) {
                *slot = changed.clone();
            }
        }
        self.view = group_by_status(&optimistic);

        let moved = match self.api.move_task(&self.board_id, &command.task_id, command.payload()).await {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(board_id = %self.board_id, task_id = %command.task_id, error = %e, "move rejected, reverting");
                self.view = group_by_status(&self.confirmed);
                return Err(e);
            }
        };

        self.cache.invalidate_tag(&board_tag(&self.board_id));
        let refetched = self.load().await.map(|_| ());
        if let Err(e) = refetched {
            // The move is stored; keep the optimistic view until the next load.
            tracing::warn!(board_id = %self.board_id, error = %e, "refetch after move failed");
            self.confirmed = optimistic;
        }
        Ok(moved)
    }
}
