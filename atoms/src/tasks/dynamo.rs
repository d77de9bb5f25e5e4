use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Put, Select, TransactWriteItem};

use super::model::Task;
use super::repository::{TaskRepository, MAX_TRANSACTION_ITEMS};
use crate::dynamo::{self, DynamoStore, Item};
use crate::error::{AtomError, AtomResult};

fn task_pk(board_id: &str) -> String {
    format!("BOARD#{}", board_id)
}

fn task_sk(task_id: &str) -> String {
    format!("TASK#{}", task_id)
}

fn task_to_item(task: &Task) -> Item {
    let mut item = Item::new();
    item.insert("PK".into(), dynamo::s(task_pk(&task.board_id)));
    item.insert("SK".into(), dynamo::s(task_sk(&task.task_id)));
    item.insert("title".into(), dynamo::s(&task.title));
    item.insert("status".into(), dynamo::s(task.status.as_str()));
    item.insert("position".into(), dynamo::n(task.position));
    item.insert("tags".into(), dynamo::list(&task.tags));
    item.insert("created_at".into(), dynamo::timestamp(&task.created_at));
    item.insert("updated_at".into(), dynamo::timestamp(&task.updated_at));
    dynamo::put_opt(&mut item, "description", task.description.as_deref().map(dynamo::s));
    dynamo::put_opt(&mut item, "priority", task.priority.map(|p| dynamo::s(p.as_str())));
    dynamo::put_opt(&mut item, "due_date", task.due_date.map(|d| dynamo::s(d.format("%Y-%m-%d").to_string())));
    dynamo::put_opt(&mut item, "assignee", task.assignee.as_deref().map(dynamo::s));
    item
}

fn task_from_item(board_id: &str, item: &Item) -> AtomResult<Option<Task>> {
    let Some(task_id) = dynamo::id_from_sk(item, "TASK#") else {
        return Ok(None);
    };

    let status = dynamo::get_s(item, "status")
        .unwrap_or_else(|| "TODO".to_string())
        .parse()
        .map_err(AtomError::persistence)?;
    let priority = dynamo::get_s(item, "priority")
        .map(|p| p.parse())
        .transpose()
        .map_err(AtomError::persistence)?;

    Ok(Some(Task {
        task_id,
        board_id: board_id.to_string(),
        title: dynamo::get_s(item, "title").unwrap_or_default(),
        description: dynamo::get_s(item, "description"),
        status,
        priority,
        due_date: dynamo::get_date(item, "due_date"),
        tags: dynamo::get_list(item, "tags"),
        assignee: dynamo::get_s(item, "assignee"),
        position: dynamo::get_n(item, "position").unwrap_or(0),
        created_at: dynamo::get_timestamp(item, "created_at"),
        updated_at: dynamo::get_timestamp(item, "updated_at"),
    }))
}

#[async_trait]
impl TaskRepository for DynamoStore {
    async fn put_task(&self, task: &Task) -> AtomResult<()> {
        self.put(task_to_item(task)).await
    }

    async fn get_task(&self, board_id: &str, task_id: &str) -> AtomResult<Option<Task>> {
        match self.get(&task_pk(board_id), &task_sk(task_id)).await? {
            Some(item) => task_from_item(board_id, &item),
            None => Ok(None),
        }
    }

    async fn list_tasks(&self, board_id: &str) -> AtomResult<Vec<Task>> {
        let items = self.query_prefix(&task_pk(board_id), "TASK#").await?;
        let mut tasks = Vec::with_capacity(items.len());
        for item in &items {
            if let Some(task) = task_from_item(board_id, item)? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    async fn count_tasks(&self, board_id: &str) -> AtomResult<usize> {
        let mut total = 0usize;
        let mut start_key: Option<Item> = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(task_pk(board_id)))
                .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
                .select(Select::Count)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| AtomError::persistence(format!("DynamoDB count query error: {}", e)))?;

            total += usize::try_from(result.count()).unwrap_or(0);

            match result.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(total)
    }

    async fn put_tasks_atomic(&self, tasks: &[Task]) -> AtomResult<()> {
        match tasks.len() {
            0 => return Ok(()),
            n if n > MAX_TRANSACTION_ITEMS => {
                return Err(AtomError::Conflict(format!(
                    "a single move may rewrite at most {} tasks",
                    MAX_TRANSACTION_ITEMS
                )))
            }
            _ => {}
        }

        let mut actions = Vec::with_capacity(tasks.len());
        for task in tasks {
            let put = Put::builder()
                .table_name(&self.table_name)
                .set_item(Some(task_to_item(task)))
                .condition_expression("attribute_exists(SK)")
                .build()
                .map_err(|e| AtomError::persistence(format!("DynamoDB transaction build error: {}", e)))?;
            actions.push(TransactWriteItem::builder().put(put).build());
        }

        self.client
            .transact_write_items()
            .set_transact_items(Some(actions))
            .send()
            .await
            .map_err(|e| {
                let cancelled = e
                    .as_service_error()
                    .map(|se| se.is_transaction_canceled_exception())
                    .unwrap_or(false);
                if cancelled {
                    AtomError::Conflict("the board changed while moving; reload and retry".to_string())
                } else {
                    AtomError::persistence(format!("DynamoDB transact_write_items error: {}", e))
                }
            })?;

        Ok(())
    }
}
