// Domain entities
pub mod event;
pub mod import_report;
pub mod response;
pub mod runtime_config;

pub use event::*;
pub use import_report::*;
pub use response::*;
pub use runtime_config::*;
