//! Planning of kanban moves.
//!
//! A move is computed against the full task list of a board and yields the
//! set of tasks whose (status, position) changed. Affected columns are
//! rewritten to consecutive positions `0..n` whenever that fits in one
//! transaction. Longer columns keep their positions; the moved task takes a
//! value between its new neighbours and only the smallest window around it
//! that has room is renumbered.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::columns::{group_by_status, StatusColumns};
use super::model::{Task, TaskStatus};
use super::repository::MAX_TRANSACTION_ITEMS;
use crate::error::{AtomError, AtomResult};

/// Spacing used when a task is placed past either end of a column.
pub const POSITION_GAP: i64 = 1024;

/// Outcome of a planned move.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    /// The moved task in its final state.
    pub task: Task,
    /// Every task whose status or position differs from the input,
    /// including the moved task. Empty for a no-op.
    pub changed: Vec<Task>,
}

impl MovePlan {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Clamps a requested index into `0..=len`.
pub fn clamp_index(requested: i64, len: usize) -> usize {
    if requested <= 0 {
        0
    } else {
        usize::try_from(requested).map_or(len, |i| i.min(len))
    }
}

/// Plans moving `task_id` to `to_index` inside the `to_status` column.
///
/// Out-of-range indexes are clamped. Moving a task onto its own slot changes
/// nothing, not even the positions of its neighbours.
pub fn plan_move(
    tasks: &[Task],
    task_id: &str,
    to_status: TaskStatus,
    to_index: i64,
    now: DateTime<Utc>,
) -> AtomResult<MovePlan> {
    let mut columns = group_by_status(tasks);
    let (from_status, from_index) = columns
        .locate(task_id)
        .ok_or_else(|| AtomError::not_found("Task"))?;

    let target = if from_status == to_status {
        let column = columns.column_mut(from_status);
        let target = clamp_index(to_index, column.len() - 1);
        if target == from_index {
            return Ok(MovePlan {
                task: column[from_index].clone(),
                changed: Vec::new(),
            });
        }
        let moving = column.remove(from_index);
        column.insert(target, moving);
        target
    } else {
        let mut moving = columns.column_mut(from_status).remove(from_index);
        moving.status = to_status;
        let destination = columns.column_mut(to_status);
        let target = clamp_index(to_index, destination.len());
        destination.insert(target, moving);
        target
    };

    let mut dense = columns.clone();
    for status in [from_status, to_status] {
        for (index, task) in dense.column_mut(status).iter_mut().enumerate() {
            task.position = index as i64;
        }
    }
    let plan = diff(tasks, dense, task_id, now)?;
    if plan.changed.len() <= MAX_TRANSACTION_ITEMS {
        return Ok(plan);
    }

    place_between_neighbours(columns.column_mut(to_status), target);
    diff(tasks, columns, task_id, now)
}

/// Gives `column[target]` a position between its neighbours, renumbering the
/// smallest window around it when they leave no room. A window that reaches
/// either end of the column always has room, so this never fails.
fn place_between_neighbours(column: &mut [Task], target: usize) {
    let len = column.len();
    for size in 1..=len {
        for lo in (target + 1).saturating_sub(size)..=target.min(len - size) {
            let hi = lo + size - 1;
            let below = lo.checked_sub(1).map(|i| column[i].position);
            let above = column.get(hi + 1).map(|t| t.position);
            if let Some(positions) = spread(below, above, size) {
                for (task, position) in column[lo..=hi].iter_mut().zip(positions) {
                    task.position = position;
                }
                return;
            }
        }
    }
}

/// `count` increasing positions strictly between `below` and `above`.
fn spread(below: Option<i64>, above: Option<i64>, count: usize) -> Option<Vec<i64>> {
    let n = count as i64;
    match (below, above) {
        (None, None) => Some((0..n).map(|i| i * POSITION_GAP).collect()),
        (Some(b), None) => Some((1..=n).map(|i| b + i * POSITION_GAP).collect()),
        (None, Some(a)) => Some((0..n).map(|i| a - (n - i) * POSITION_GAP).collect()),
        (Some(b), Some(a)) => {
            let step = a.saturating_sub(b) / (n + 1);
            (step >= 1).then(|| (1..=n).map(|i| b + i * step).collect())
        }
    }
}

fn diff(tasks: &[Task], columns: StatusColumns, task_id: &str, now: DateTime<Utc>) -> AtomResult<MovePlan> {
    let originals: HashMap<&str, &Task> = tasks.iter().map(|t| (t.task_id.as_str(), t)).collect();
    let mut moved = None;
    let mut changed = Vec::new();
    for mut task in columns.into_tasks() {
        let differs = originals
            .get(task.task_id.as_str())
            .map_or(true, |o| o.status != task.status || o.position != task.position);
        if differs {
            task.updated_at = now;
            changed.push(task.clone());
        }
        if task.task_id == task_id {
            moved = Some(task);
        }
    }

    let task = moved.ok_or_else(|| AtomError::not_found("Task"))?;
    Ok(MovePlan { task, changed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::columns::tests::task;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn apply(tasks: &[Task], plan: &MovePlan) -> Vec<Task> {
        tasks
            .iter()
            .map(|t| {
                plan.changed
                    .iter()
                    .find(|c| c.task_id == t.task_id)
                    .cloned()
                    .unwrap_or_else(|| t.clone())
            })
            .collect()
    }

    fn column(tasks: &[Task], status: TaskStatus) -> Vec<(String, i64)> {
        group_by_status(tasks)
            .column(status)
            .iter()
            .map(|t| (t.task_id.clone(), t.position))
            .collect()
    }

    fn pairs(items: &[(&str, i64)]) -> Vec<(String, i64)> {
        items.iter().map(|(id, p)| (id.to_string(), *p)).collect()
    }

    #[test]
    fn cross_column_move_into_empty_column() {
        let tasks = vec![task("A", TaskStatus::Todo, 0), task("B", TaskStatus::Todo, 1)];
        let plan = plan_move(&tasks, "A", TaskStatus::Done, 0, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(column(&after, TaskStatus::Todo), pairs(&[("B", 0)]));
        assert_eq!(column(&after, TaskStatus::Done), pairs(&[("A", 0)]));
        assert_eq!(plan.task.status, TaskStatus::Done);
        assert_eq!(plan.task.updated_at, now());
    }

    #[test]
    fn same_column_reorder_to_front() {
        let tasks = vec![
            task("A", TaskStatus::Todo, 0),
            task("B", TaskStatus::Todo, 1),
            task("C", TaskStatus::Todo, 2),
        ];
        let plan = plan_move(&tasks, "C", TaskStatus::Todo, 0, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(column(&after, TaskStatus::Todo), pairs(&[("C", 0), ("A", 1), ("B", 2)]));
        assert_eq!(plan.changed.len(), 3);
    }

    #[test]
    fn same_column_reorder_downwards() {
        let tasks = vec![
            task("A", TaskStatus::Todo, 0),
            task("B", TaskStatus::Todo, 1),
            task("C", TaskStatus::Todo, 2),
        ];
        let plan = plan_move(&tasks, "A", TaskStatus::Todo, 2, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(column(&after, TaskStatus::Todo), pairs(&[("B", 0), ("C", 1), ("A", 2)]));
    }

    #[test]
    fn moving_onto_own_slot_changes_nothing() {
        let tasks = vec![
            task("A", TaskStatus::Todo, 0),
            task("B", TaskStatus::Todo, 4),
            task("C", TaskStatus::Todo, 9),
        ];
        let plan = plan_move(&tasks, "B", TaskStatus::Todo, 1, now()).unwrap();

        assert!(plan.is_noop());
        assert_eq!(plan.task, tasks[1]);
    }

    #[test]
    fn insert_in_middle_shifts_destination_down() {
        let tasks = vec![
            task("A", TaskStatus::Todo, 0),
            task("X", TaskStatus::Done, 0),
            task("Y", TaskStatus::Done, 1),
            task("Z", TaskStatus::Done, 2),
        ];
        let plan = plan_move(&tasks, "A", TaskStatus::Done, 1, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(
            column(&after, TaskStatus::Done),
            pairs(&[("X", 0), ("A", 1), ("Y", 2), ("Z", 3)])
        );
        let changed: Vec<&str> = plan.changed.iter().map(|t| t.task_id.as_str()).collect();
        assert!(!changed.contains(&"X"));
    }

    #[test]
    fn untouched_columns_are_not_rewritten() {
        let tasks = vec![
            task("A", TaskStatus::Todo, 0),
            task("P", TaskStatus::Pending, 7),
            task("Q", TaskStatus::Pending, 12),
        ];
        let plan = plan_move(&tasks, "A", TaskStatus::Done, 0, now()).unwrap();

        assert!(plan.changed.iter().all(|t| t.status != TaskStatus::Pending));
    }

    #[test]
    fn sparse_positions_are_resequenced() {
        let tasks = vec![
            task("A", TaskStatus::Todo, 10),
            task("B", TaskStatus::Todo, 20),
            task("C", TaskStatus::Todo, 30),
        ];
        let plan = plan_move(&tasks, "C", TaskStatus::Todo, 1, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(column(&after, TaskStatus::Todo), pairs(&[("A", 0), ("C", 1), ("B", 2)]));
    }

    #[rstest]
    #[case(-3, vec![("A", 0), ("B", 1), ("C", 2)])]
    #[case(99, vec![("B", 0), ("C", 1), ("A", 2)])]
    fn out_of_range_positions_are_clamped(#[case] to: i64, #[case] expected: Vec<(&str, i64)>) {
        let tasks = vec![
            task("A", TaskStatus::Todo, 0),
            task("B", TaskStatus::Todo, 1),
            task("C", TaskStatus::Todo, 2),
        ];
        let plan = plan_move(&tasks, "A", TaskStatus::Todo, to, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(column(&after, TaskStatus::Todo), pairs(&expected));
    }

    #[test]
    fn cross_column_past_the_end_appends() {
        let tasks = vec![task("A", TaskStatus::Todo, 0), task("D", TaskStatus::Done, 0)];
        let plan = plan_move(&tasks, "A", TaskStatus::Done, 42, now()).unwrap();

        assert_eq!(plan.task.position, 1);
    }

    #[test]
    fn unknown_task_is_not_found() {
        let tasks = vec![task("A", TaskStatus::Todo, 0)];
        let err = plan_move(&tasks, "nope", TaskStatus::Done, 0, now()).unwrap_err();
        assert_eq!(err, AtomError::not_found("Task"));
    }

    fn long_column(len: usize) -> Vec<Task> {
        (0..len)
            .map(|i| task(&format!("T{:03}", i), TaskStatus::Todo, i as i64))
            .collect()
    }

    fn ids(tasks: &[Task], status: TaskStatus) -> Vec<String> {
        group_by_status(tasks)
            .column(status)
            .iter()
            .map(|t| t.task_id.clone())
            .collect()
    }

    #[test]
    fn long_column_move_to_top_writes_only_the_moved_task() {
        let tasks = long_column(150);
        let plan = plan_move(&tasks, "T149", TaskStatus::Todo, 0, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(plan.changed.len(), 1);
        assert_eq!(plan.task.position, -POSITION_GAP);
        let order = ids(&after, TaskStatus::Todo);
        assert_eq!(order[0], "T149");
        assert_eq!(order[1], "T000");
        assert_eq!(order.len(), 150);
    }

    #[test]
    fn very_long_column_renumbers_the_short_side_only() {
        let mut tasks = long_column(250);
        tasks.push(task("X", TaskStatus::Done, 0));
        let plan = plan_move(&tasks, "X", TaskStatus::Todo, 50, now()).unwrap();
        let after = apply(&tasks, &plan);

        assert_eq!(plan.changed.len(), 51);
        assert!(plan.changed.len() <= MAX_TRANSACTION_ITEMS);
        let order = ids(&after, TaskStatus::Todo);
        assert_eq!(order.len(), 251);
        assert_eq!(order[49], "T049");
        assert_eq!(order[50], "X");
        assert_eq!(order[51], "T050");
        assert!(ids(&after, TaskStatus::Done).is_empty());
    }

    #[test]
    fn long_column_uses_existing_gaps() {
        let tasks: Vec<Task> = (0..120)
            .map(|i| task(&format!("T{:03}", i), TaskStatus::Todo, i as i64 * 10))
            .collect();
        let plan = plan_move(&tasks, "T119", TaskStatus::Todo, 1, now()).unwrap();

        assert_eq!(plan.changed.len(), 1);
        assert_eq!(plan.task.position, 5);
    }

    #[rstest]
    #[case(None, None, 2, Some(vec![0, POSITION_GAP]))]
    #[case(Some(7), None, 1, Some(vec![7 + POSITION_GAP]))]
    #[case(None, Some(0), 2, Some(vec![-2 * POSITION_GAP, -POSITION_GAP]))]
    #[case(Some(0), Some(10), 2, Some(vec![3, 6]))]
    #[case(Some(4), Some(5), 1, None)]
    fn spreads_between_bounds(
        #[case] below: Option<i64>,
        #[case] above: Option<i64>,
        #[case] count: usize,
        #[case] expected: Option<Vec<i64>>,
    ) {
        assert_eq!(spread(below, above, count), expected);
    }

    #[rstest]
    #[case(-1, 3, 0)]
    #[case(0, 3, 0)]
    #[case(2, 3, 2)]
    #[case(3, 3, 3)]
    #[case(i64::MAX, 3, 3)]
    fn clamps_index(#[case] requested: i64, #[case] len: usize, #[case] expected: usize) {
        assert_eq!(clamp_index(requested, len), expected);
    }
}
