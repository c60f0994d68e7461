use crate::error::ResizeError;
use crate::image_processing;
use crate::response::ResponseEnvelope;
use crate::storage::ObjectStore;
use crate::validation::ResizeRequest;

/// Fetch, resize and encode one object.
///
/// The stored object's stream is moved in here and dropped on every return
/// path, so nothing stays open after a failed decode or encode.
pub async fn resize_object<S: ObjectStore>(
    store: &S,
    request: &ResizeRequest,
    jpeg_quality: u8,
    max_dimension: u32,
) -> Result<ResponseEnvelope, ResizeError> {
    let object = store
        .get_object(&request.bucket, &request.object_key)
        .await?;
    let (bytes, metadata) = object.into_bytes().await?;

    let img = image_processing::decode(&bytes)?;
    let (src_width, src_height) = (img.width(), img.height());

    let encoded = image_processing::resize_to_jpeg(
        img,
        request.width,
        request.height,
        jpeg_quality,
        max_dimension,
    )?;

    tracing::info!(
        key = %request.object_key,
        src_width,
        src_height,
        width = encoded.width,
        height = encoded.height,
        size = encoded.bytes.len(),
        "image resized"
    );

    Ok(ResponseEnvelope::jpeg(&encoded.bytes, &metadata))
}

/// Turn a failure into its response, logging the detail that the caller never sees
pub fn error_response(err: &ResizeError) -> ResponseEnvelope {
    if err.is_client_error() {
        tracing::warn!(error = %err, "request rejected");
    } else {
        tracing::error!(error = ?err, "request failed");
    }
    ResponseEnvelope::error(err.status_code())
}
