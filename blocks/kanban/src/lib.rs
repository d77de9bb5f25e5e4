//! Kanban board block: the composite board view plus the client-side pieces
//! of drag-and-drop (gesture state machine, optimistic session, query cache).

pub mod board_view;
pub mod cache;
pub mod drag;
pub mod session;

pub use board_view::{board_columns, board_columns_handler, BoardColumnsView};
pub use cache::QueryCache;
pub use drag::{DragController, DragOutcome, DropTarget, Droppable, MoveCommand, Point, Rect};
pub use session::{BoardApi, BoardSession, ServiceBoardApi};
