//! Partition of a board's tasks into its fixed status columns.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{Task, TaskStatus};

/// The five status columns of a board, each ordered by position.
///
/// Every status is always present so empty columns still render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatusColumns(BTreeMap<TaskStatus, Vec<Task>>);

impl StatusColumns {
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.0.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        self.0.iter().map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    /// Column and index of a task, if it is on the board.
    pub fn locate(&self, task_id: &str) -> Option<(TaskStatus, usize)> {
        self.iter().find_map(|(status, tasks)| {
            tasks
                .iter()
                .position(|t| t.task_id == task_id)
                .map(|index| (status, index))
        })
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens back into one list in column order.
    pub fn into_tasks(self) -> Vec<Task> {
        self.0.into_values().flatten().collect()
    }

    pub(crate) fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        self.0.entry(status).or_default()
    }
}

impl Default for StatusColumns {
    fn default() -> Self {
        group_by_status(&[])
    }
}

/// Groups tasks by status, ordering each column by position.
///
/// Ties on position fall back to creation time and then id so the same input
/// always yields the same columns.
pub fn group_by_status(tasks: &[Task]) -> StatusColumns {
    let mut columns: BTreeMap<TaskStatus, Vec<Task>> =
        TaskStatus::ALL.into_iter().map(|s| (s, Vec::new())).collect();

    for task in tasks {
        columns.entry(task.status).or_default().push(task.clone());
    }

    for column in columns.values_mut() {
        column.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
    }

    StatusColumns(columns)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn task(id: &str, status: TaskStatus, position: i64) -> Task {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Task {
            task_id: id.to_string(),
            board_id: "board-1".to_string(),
            title: format!("Task {id}"),
            description: None,
            status,
            priority: None,
            due_date: None,
            tags: vec![],
            assignee: None,
            position,
            created_at: created,
            updated_at: created,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.task_id.as_str()).collect()
    }

    #[test]
    fn empty_board_has_all_five_columns() {
        let columns = group_by_status(&[]);
        let statuses: Vec<TaskStatus> = columns.iter().map(|(s, _)| s).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        assert!(columns.is_empty());
    }

    #[test]
    fn partition_covers_every_task_exactly_once() {
        let tasks = vec![
            task("a", TaskStatus::Done, 3),
            task("b", TaskStatus::Todo, 1),
            task("c", TaskStatus::Dropped, 0),
            task("d", TaskStatus::Todo, 0),
            task("e", TaskStatus::Pending, 7),
        ];
        let columns = group_by_status(&tasks);

        assert_eq!(columns.iter().count(), 5);
        assert_eq!(columns.len(), tasks.len());
        let mut seen: Vec<String> = columns.clone().into_tasks().into_iter().map(|t| t.task_id).collect();
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(ids(columns.column(TaskStatus::Todo)), vec!["d", "b"]);
        assert!(columns.column(TaskStatus::InProgress).is_empty());
    }

    #[test]
    fn ties_break_on_creation_then_id() {
        let mut late = task("z", TaskStatus::Todo, 0);
        late.created_at = late.created_at + chrono::Duration::minutes(5);
        let tasks = vec![late, task("y", TaskStatus::Todo, 0), task("x", TaskStatus::Todo, 0)];

        let first = group_by_status(&tasks);
        let mut reversed = tasks.clone();
        reversed.reverse();
        let second = group_by_status(&reversed);

        assert_eq!(ids(first.column(TaskStatus::Todo)), vec!["x", "y", "z"]);
        assert_eq!(first, second);
    }

    #[test]
    fn locate_reports_column_and_index() {
        let columns = group_by_status(&[
            task("a", TaskStatus::Todo, 0),
            task("b", TaskStatus::Done, 0),
            task("c", TaskStatus::Done, 1),
        ]);
        assert_eq!(columns.locate("c"), Some((TaskStatus::Done, 1)));
        assert_eq!(columns.locate("missing"), None);
    }

    #[test]
    fn serializes_as_status_keyed_map() {
        let columns = group_by_status(&[task("a", TaskStatus::InProgress, 0)]);
        let value = serde_json::to_value(&columns).unwrap();
        assert_eq!(value["IN_PROGRESS"][0]["taskId"], "a");
        assert_eq!(value["DROPPED"], serde_json::json!([]));
    }
}
