use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;
use image_resizer_shared::config::Config;
use image_resizer_shared::storage::S3ObjectStore;
use image_resizer_shared::AppState;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Initialize the S3 client once at startup
    let aws_config = aws_config::load_from_env().await;
    let config = Config::from_env();
    tracing::info!(
        bucket = %config.bucket_name,
        allowed_hosts = ?config.allowed_hosts,
        "image resizer starting"
    );

    let state = AppState::new(S3ObjectStore::from_conf(&aws_config), &config);

    run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
