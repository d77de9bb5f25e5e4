use async_trait::async_trait;

use super::model::Task;
use crate::error::AtomResult;

/// Most tasks a single `put_tasks_atomic` call may write. DynamoDB caps a
/// transaction at 100 actions and every adapter enforces the same limit.
pub const MAX_TRANSACTION_ITEMS: usize = 100;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates or overwrites a single task.
    async fn put_task(&self, task: &Task) -> AtomResult<()>;

    async fn get_task(&self, board_id: &str, task_id: &str) -> AtomResult<Option<Task>>;

    /// All tasks of a board, in no particular order.
    async fn list_tasks(&self, board_id: &str) -> AtomResult<Vec<Task>>;

    async fn count_tasks(&self, board_id: &str) -> AtomResult<usize> {
        Ok(self.list_tasks(board_id).await?.len())
    }

    /// Overwrites every given task in one all-or-nothing write.
    ///
    /// # Errors
    ///
    /// Fails without writing anything when one of the tasks no longer exists
    /// or when more than [`MAX_TRANSACTION_ITEMS`] tasks are given.
    async fn put_tasks_atomic(&self, tasks: &[Task]) -> AtomResult<()>;
}
