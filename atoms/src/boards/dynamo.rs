use async_trait::async_trait;

use super::model::Board;
use super::repository::BoardRepository;
use crate::dynamo::{self, DynamoStore, Item};
use crate::error::AtomResult;

// PK = "BOARD", SK = "BOARD#{board_id}"
const BOARD_PK: &str = "BOARD";

fn board_sk(board_id: &str) -> String {
    format!("BOARD#{}", board_id)
}

fn board_to_item(board: &Board) -> Item {
    let mut item = Item::new();
    item.insert("PK".into(), dynamo::s(BOARD_PK));
    item.insert("SK".into(), dynamo::s(board_sk(&board.board_id)));
    item.insert("owner_id".into(), dynamo::s(&board.owner_id));
    item.insert("board_name".into(), dynamo::s(&board.name));
    item.insert("tags".into(), dynamo::list(&board.tags));
    item.insert("archived".into(), aws_sdk_dynamodb::types::AttributeValue::Bool(board.archived));
    item.insert("created_at".into(), dynamo::timestamp(&board.created_at));
    item.insert("updated_at".into(), dynamo::timestamp(&board.updated_at));
    dynamo::put_opt(&mut item, "description", board.description.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "color", board.color.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "archived_at", board.archived_at.as_ref().map(dynamo::timestamp));
    item
}

fn board_from_item(item: &Item) -> Option<Board> {
    let board_id = dynamo::id_from_sk(item, "BOARD#")?;
    Some(Board {
        board_id,
        owner_id: dynamo::get_s(item, "owner_id").unwrap_or_default(),
        name: dynamo::get_s(item, "board_name").unwrap_or_default(),
        description: dynamo::get_s(item, "description"),
        color: dynamo::get_s(item, "color"),
        tags: dynamo::get_list(item, "tags"),
        task_count: 0,
        archived: dynamo::get_bool(item, "archived"),
        archived_at: dynamo::get_s(item, "archived_at").map(|_| dynamo::get_timestamp(item, "archived_at")),
        created_at: dynamo::get_timestamp(item, "created_at"),
        updated_at: dynamo::get_timestamp(item, "updated_at"),
    })
}

#[async_trait]
impl BoardRepository for DynamoStore {
    async fn put_board(&self, board: &Board) -> AtomResult<()> {
        self.put(board_to_item(board)).await
    }

    async fn get_board(&self, board_id: &str) -> AtomResult<Option<Board>> {
        Ok(self
            .get(BOARD_PK, &board_sk(board_id))
            .await?
            .as_ref()
            .and_then(board_from_item))
    }

    async fn list_boards(&self, owner_id: &str) -> AtomResult<Vec<Board>> {
        let items = self.query_prefix(BOARD_PK, "BOARD#").await?;
        Ok(items
            .iter()
            .filter_map(board_from_item)
            .filter(|b| b.owner_id == owner_id)
            .collect())
    }
}
