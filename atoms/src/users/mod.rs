pub mod dynamo;
pub mod http;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{CreateProfilePayload, DriverProfile, OnboardingProgress, OnboardingStep, UpdateProfilePayload};
pub use repository::ProfileRepository;
