pub use aws_slack_relay::notifier::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    aws_slack_relay::setup_logging();
    tracing::info!("Starting login notifier Lambda");
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
