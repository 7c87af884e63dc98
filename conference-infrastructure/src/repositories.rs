pub mod json_event_store;

pub use json_event_store::*;
