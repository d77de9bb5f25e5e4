//! Pointer gestures on the board turned into at most one move per gesture.
//!
//! ```text
//! Idle --press--> Pressed --move >= activation--> Dragging
//!   ^               |                               |
//!   +--release------+ (click: open task)            |
//!   +--------------- release (drop) / cancel -------+
//! ```
//!
//! While dragging, the hovered drop target only produces a provisional slot;
//! nothing is sent until the drop.

use driverdesk_atoms::tasks::{MoveTaskPayload, StatusColumns, TaskStatus};

/// Pointer travel (in px) that separates a click from a drag.
pub const ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// What a droppable area on screen stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A task card; dropping here takes its slot.
    Task(String),
    /// The body of a column; dropping here appends.
    Column(TaskStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    pub target: DropTarget,
    pub rect: Rect,
}

/// A (status, index) position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub status: TaskStatus,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub task_id: String,
    pub status: TaskStatus,
    pub position: i64,
}

impl MoveCommand {
    pub fn payload(&self) -> MoveTaskPayload {
        MoveTaskPayload {
            status: self.status,
            position: self.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Nothing,
    /// Press and release without moving: open the edit view.
    OpenTask(String),
    Move(MoveCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pressed {
        task_id: String,
        origin: Point,
        from: Slot,
    },
    Dragging {
        task_id: String,
        from: Slot,
        over: Option<Slot>,
    },
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    activation_distance: f64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(ACTIVATION_DISTANCE)
    }
}

/// Droppable whose center is closest to the pointer.
pub fn closest_center<'a>(pointer: &Point, droppables: &'a [Droppable]) -> Option<&'a Droppable> {
    droppables.iter().min_by(|a, b| {
        let da = a.rect.center().distance(pointer);
        let db = b.rect.center().distance(pointer);
        da.total_cmp(&db)
    })
}

impl DragController {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Provisional slot under the pointer, for the drop placeholder.
    pub fn provisional(&self) -> Option<Slot> {
        match &self.state {
            DragState::Dragging { over, .. } => *over,
            _ => None,
        }
    }

    /// Pointer down on a task card. Ignored unless idle or the task is unknown.
    pub fn press(&mut self, task_id: &str, at: Point, columns: &StatusColumns) {
        if !matches!(self.state, DragState::Idle) {
            return;
        }
        if let Some((status, index)) = columns.locate(task_id) {
            self.state = DragState::Pressed {
                task_id: task_id.to_string(),
                origin: at,
                from: Slot { status, index },
            };
        }
    }

    pub fn pointer_move(&mut self, at: Point, droppables: &[Droppable], columns: &StatusColumns) {
        if let DragState::Pressed { task_id, origin, from } = &self.state {
            if origin.distance(&at) < self.activation_distance {
                return;
            }
            self.state = DragState::Dragging {
                task_id: task_id.clone(),
                from: *from,
                over: None,
            };
        }

        if let DragState::Dragging { task_id, from, over } = &mut self.state {
            *over = closest_center(&at, droppables).and_then(|d| resolve(&d.target, task_id, *from, columns));
        }
    }

    /// Pointer up. Yields at most one command for the whole gesture.
    pub fn release(&mut self) -> DragOutcome {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Nothing,
            DragState::Pressed { task_id, .. } => DragOutcome::OpenTask(task_id),
            DragState::Dragging { task_id, from, over } => match over {
                Some(slot) if slot != from => DragOutcome::Move(MoveCommand {
                    task_id,
                    status: slot.status,
                    position: slot.index as i64,
                }),
                _ => DragOutcome::Nothing,
            },
        }
    }

    /// Escape key or pointer lost.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Final slot the dragged task would land in if dropped on `target`.
fn resolve(target: &DropTarget, dragged: &str, from: Slot, columns: &StatusColumns) -> Option<Slot> {
    match target {
        DropTarget::Task(id) if id == dragged => Some(from),
        DropTarget::Task(id) => columns.locate(id).map(|(status, index)| Slot { status, index }),
        DropTarget::Column(status) => {
            let len = columns.column(*status).len();
            let index = if *status == from.status { len.saturating_sub(1) } else { len };
            Some(Slot { status: *status, index })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use driverdesk_atoms::tasks::{group_by_status, Task};

    fn task(id: &str, status: TaskStatus, position: i64) -> Task {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Task {
            task_id: id.into(),
            board_id: "b".into(),
            title: id.into(),
            description: None,
            status,
            priority: None,
            due_date: None,
            tags: vec![],
            assignee: None,
            position,
            created_at: at,
            updated_at: at,
        }
    }

    fn board() -> StatusColumns {
        group_by_status(&[
            task("A", TaskStatus::Todo, 0),
            task("B", TaskStatus::Todo, 1),
            task("C", TaskStatus::Todo, 2),
            task("X", TaskStatus::Done, 0),
        ])
    }

    fn rect(x: f64, y: f64) -> Rect {
        Rect {
            x,
            y,
            width: 100.0,
            height: 40.0,
        }
    }

    /// Todo cards stacked at x=0, Done cards at x=200, empty In Progress column at x=400.
    fn droppables() -> Vec<Droppable> {
        vec![
            Droppable { target: DropTarget::Task("A".into()), rect: rect(0.0, 0.0) },
            Droppable { target: DropTarget::Task("B".into()), rect: rect(0.0, 50.0) },
            Droppable { target: DropTarget::Task("C".into()), rect: rect(0.0, 100.0) },
            Droppable { target: DropTarget::Task("X".into()), rect: rect(200.0, 0.0) },
            Droppable {
                target: DropTarget::Column(TaskStatus::InProgress),
                rect: Rect { x: 400.0, y: 0.0, width: 100.0, height: 400.0 },
            },
        ]
    }

    #[test]
    fn short_press_is_a_click() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("B", Point::new(50.0, 70.0), &cols);
        drag.pointer_move(Point::new(53.0, 72.0), &droppables(), &cols);
        assert!(!drag.is_dragging());
        assert_eq!(drag.release(), DragOutcome::OpenTask("B".into()));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn drag_to_top_of_same_column() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("C", Point::new(50.0, 120.0), &cols);
        drag.pointer_move(Point::new(50.0, 60.0), &droppables(), &cols);
        drag.pointer_move(Point::new(50.0, 18.0), &droppables(), &cols);
        assert_eq!(drag.provisional(), Some(Slot { status: TaskStatus::Todo, index: 0 }));

        assert_eq!(
            drag.release(),
            DragOutcome::Move(MoveCommand {
                task_id: "C".into(),
                status: TaskStatus::Todo,
                position: 0,
            })
        );
    }

    #[test]
    fn drop_on_empty_column_appends() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("A", Point::new(50.0, 20.0), &cols);
        drag.pointer_move(Point::new(450.0, 200.0), &droppables(), &cols);
        assert_eq!(
            drag.release(),
            DragOutcome::Move(MoveCommand {
                task_id: "A".into(),
                status: TaskStatus::InProgress,
                position: 0,
            })
        );
    }

    #[test]
    fn drop_on_card_in_other_column_takes_its_slot() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("B", Point::new(50.0, 70.0), &cols);
        drag.pointer_move(Point::new(250.0, 20.0), &droppables(), &cols);
        assert_eq!(
            drag.release(),
            DragOutcome::Move(MoveCommand {
                task_id: "B".into(),
                status: TaskStatus::Done,
                position: 0,
            })
        );
    }

    #[test]
    fn dropping_back_on_origin_is_a_no_op() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("B", Point::new(50.0, 70.0), &cols);
        drag.pointer_move(Point::new(250.0, 20.0), &droppables(), &cols);
        drag.pointer_move(Point::new(50.0, 71.0), &droppables(), &cols);
        assert!(drag.is_dragging());
        assert_eq!(drag.release(), DragOutcome::Nothing);
    }

    #[test]
    fn cancel_issues_nothing() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("A", Point::new(50.0, 20.0), &cols);
        drag.pointer_move(Point::new(450.0, 200.0), &droppables(), &cols);
        drag.cancel();
        assert_eq!(drag.release(), DragOutcome::Nothing);
    }

    #[test]
    fn one_command_per_gesture() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("A", Point::new(50.0, 20.0), &cols);
        for y in [60.0, 90.0, 120.0, 130.0] {
            drag.pointer_move(Point::new(50.0, y), &droppables(), &cols);
        }
        assert!(matches!(drag.release(), DragOutcome::Move(_)));
        assert_eq!(drag.release(), DragOutcome::Nothing);
    }

    #[test]
    fn pressing_unknown_task_stays_idle() {
        let cols = board();
        let mut drag = DragController::default();
        drag.press("ghost", Point::new(0.0, 0.0), &cols);
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn same_column_append_targets_last_index() {
        let cols = board();
        let slot = resolve(
            &DropTarget::Column(TaskStatus::Todo),
            "A",
            Slot { status: TaskStatus::Todo, index: 0 },
            &cols,
        );
        assert_eq!(slot, Some(Slot { status: TaskStatus::Todo, index: 2 }));
    }
}
