//! Console login notifier: SNS → CloudWatch event → CloudTrail record → Slack.

pub mod envelope;
pub mod formatter;
pub mod handler;

pub use handler::{handler, process_notification};
