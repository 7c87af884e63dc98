pub mod api_service;
pub mod health_service;

pub use api_service::*;
pub use health_service::*;
