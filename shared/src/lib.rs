pub mod auth;
pub mod config;
pub mod state;
pub mod telemetry;

pub use config::{Config, ConfigError, LogFormat};
pub use state::AppState;
