//! Configuration, credentials and the shared Slack event model.

pub mod config;
pub mod models;
pub mod secrets;
