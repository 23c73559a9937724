//! Slack webhook handler and request processing

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod interactive_handler;
pub mod parsing;
pub mod request;
pub mod signature;

// Re-export the main handler for convenience
pub use handler::{handler, process_request};
