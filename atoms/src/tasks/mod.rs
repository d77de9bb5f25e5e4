pub mod columns;
pub mod dynamo;
pub mod http;
pub mod model;
pub mod ordering;
pub mod repository;
pub mod service;

pub use columns::{group_by_status, StatusColumns};
pub use model::{CreateTaskPayload, MoveTaskPayload, Task, TaskPriority, TaskStatus, UpdateTaskPayload};
pub use ordering::{plan_move, MovePlan};
pub use repository::TaskRepository;
