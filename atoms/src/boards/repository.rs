use async_trait::async_trait;

use super::model::Board;
use crate::error::AtomResult;

/// Board persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn put_board(&self, board: &Board) -> AtomResult<()>;

    async fn get_board(&self, board_id: &str) -> AtomResult<Option<Board>>;

    /// Every board owned by `owner_id`, archived ones included.
    async fn list_boards(&self, owner_id: &str) -> AtomResult<Vec<Board>>;
}
