use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;
use image_resizer_shared::response::ResponseEnvelope;
use image_resizer_shared::storage::ObjectStore;
use image_resizer_shared::AppState;
use lambda_runtime::{Error, LambdaEvent};
use std::sync::Arc;

/// Main Lambda handler - resizes the object named by the request path
pub(crate) async fn function_handler<S: ObjectStore>(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    state: Arc<AppState<S>>,
) -> Result<ResponseEnvelope, Error> {
    let request = event.payload;
    let path = request.path.as_deref().unwrap_or("/");
    let width = request.query_string_parameters.first("width");
    let height = request.query_string_parameters.first("height");

    tracing::info!(
        request_id = %event.context.request_id,
        path,
        width,
        height,
        "resize requested"
    );

    Ok(state.handle(path, width, height).await)
}
