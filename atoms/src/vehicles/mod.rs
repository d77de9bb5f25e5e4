pub mod dynamo;
pub mod http;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{
    CreateVehiclePayload, Financing, FuelType, Insurance, Specifications, UpdateVehiclePayload, Vehicle, VehicleStatus,
};
pub use repository::VehicleRepository;
