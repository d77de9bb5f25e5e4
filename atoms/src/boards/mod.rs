pub mod dynamo;
pub mod http;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{Board, CreateBoardPayload, UpdateBoardPayload};
pub use repository::BoardRepository;
