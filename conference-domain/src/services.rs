pub mod event_context;

pub use event_context::*;
