//! AWS ↔ Slack relay - two small Lambda integrations.
//!
//! 1. A webhook Lambda (`api`) that verifies Slack Events API and interactive
//!    requests and answers them through the Slack Web API
//! 2. A notifier Lambda (`notifier`) that turns CloudTrail console login
//!    events delivered over SNS into Slack webhook alerts
//!
//! # Architecture
//!
//! Both handlers are stateless. Each invocation:
//! - fetches Slack credentials from AWS Secrets Manager
//! - builds its own HTTP clients
//! - makes at most one Slack call per event, without retries
//!
//! # Example
//!
//! ```
//! use aws_slack_relay::api::parsing::parse_event;
//! use aws_slack_relay::core::models::ClassifiedEvent;
//!
//! let event = parse_event(r#"{"type":"url_verification","challenge":"abc"}"#).unwrap();
//! assert_eq!(event, ClassifiedEvent::Challenge { challenge: "abc".into() });
//! ```

// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod notifier;
pub mod slack;

pub use errors::RelayError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level comes from `RUST_LOG` and defaults
/// to `info`. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// aws_slack_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
