//! Domain atoms of the DriverDesk backend.
//!
//! Each entity module follows the same split: `model` (types and
//! validation), `repository` (the persistence port), `dynamo` (the DynamoDB
//! adapter), `service` (operations over [`store::Repositories`]) and `http`
//! (Lambda handlers that turn results into responses).

pub mod boards;
pub mod companies;
pub mod documents;
pub mod dynamo;
pub mod error;
pub mod http;
pub mod memory;
pub mod storage;
pub mod store;
pub mod tasks;
pub mod users;
pub mod vehicles;

pub use error::{AtomError, AtomResult};
pub use store::Repositories;
