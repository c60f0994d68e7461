pub mod config;
pub mod error;
pub mod image_processing;
pub mod resizer;
pub mod response;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use config::Config;
use response::ResponseEnvelope;
use storage::{ObjectStore, S3ObjectStore};
use validation::RequestValidator;

/// Shared application state, built once per cold start
pub struct AppState<S = S3ObjectStore> {
    pub store: S,
    pub validator: RequestValidator,
    pub jpeg_quality: u8,
    pub max_dimension: u32,
}

impl<S: ObjectStore> AppState<S> {
    pub fn new(store: S, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            store,
            validator: RequestValidator::new(config),
            jpeg_quality: config.jpeg_quality,
            max_dimension: config.max_dimension,
        })
    }

    /// Validate, fetch, resize and answer. Always yields exactly one envelope.
    pub async fn handle(
        &self,
        path: &str,
        width: Option<&str>,
        height: Option<&str>,
    ) -> ResponseEnvelope {
        let request = match self.validator.validate(path, width, height) {
            Ok(request) => request,
            Err(e) => return resizer::error_response(&e),
        };

        let result = resizer::resize_object(
            &self.store,
            &request,
            self.jpeg_quality,
            self.max_dimension,
        )
        .await;

        match result {
            Ok(resp) => resp,
            Err(e) => resizer::error_response(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::StoredObject;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use image::{DynamicImage, ImageFormat};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory bucket keyed by object key
    #[derive(Default)]
    struct MemoryStore {
        objects: HashMap<String, Vec<u8>>,
        calls: AtomicUsize,
    }

    impl MemoryStore {
        fn with(key: &str, bytes: Vec<u8>) -> Self {
            let mut store = Self::default();
            store.objects.insert(key.to_string(), bytes);
            store
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ObjectStore for MemoryStore {
        async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.objects
                .get(key)
                .map(|bytes| StoredObject::new(bytes.clone()))
                .ok_or_else(|| StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn body_dimensions(resp: &ResponseEnvelope) -> (u32, u32) {
        assert!(resp.is_base64_encoded);
        let bytes = STANDARD.decode(&resp.body).unwrap();
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        (img.width(), img.height())
    }

    #[tokio::test]
    async fn test_narrow_image_passes_through() {
        let state = AppState::new(
            MemoryStore::with("images.story.io", png(50, 40)),
            &Config::default(),
        );

        let resp = state.handle("/images.story.io", Some("100"), None).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers["Content-Type"], "image/jpeg");
        assert_eq!(body_dimensions(&resp), (50, 40));
    }

    #[tokio::test]
    async fn test_wide_image_resized_to_exact_size() {
        let state = AppState::new(
            MemoryStore::with("images.story.io", png(500, 300)),
            &Config::default(),
        );

        let resp = state.handle("/images.story.io", Some("100"), Some("80")).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(body_dimensions(&resp), (100, 80));
    }

    #[tokio::test]
    async fn test_zero_dimensions_rejected() {
        let state = AppState::new(
            MemoryStore::with("images.story.io", png(10, 10)),
            &Config::default(),
        );

        let resp = state.handle("/images.story.io", Some("0"), Some("0")).await;
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.body, "Bad Request");
        assert_eq!(state.store.calls(), 0);
    }

    #[tokio::test]
    async fn test_disallowed_host_never_reaches_storage() {
        let state = AppState::new(
            MemoryStore::with("not-allowed", png(10, 10)),
            &Config::default(),
        );

        let resp = state.handle("/not-allowed", Some("100"), None).await;
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.headers["Content-Type"], "text/plain");
        assert_eq!(state.store.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let state = AppState::new(MemoryStore::default(), &Config::default());

        let resp = state.handle("/images.story.io", Some("100"), None).await;
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.body, "Not Found");
        assert_eq!(state.store.calls(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_object_is_server_error() {
        let state = AppState::new(
            MemoryStore::with("images.story.io", b"\x89PNG\r\n\x1a\ncorrupt".to_vec()),
            &Config::default(),
        );

        let resp = state.handle("/images.story.io", Some("100"), None).await;
        assert_eq!(resp.status_code, 500);
        assert_eq!(resp.body, "Internal Server Error");
        assert!(!resp.is_base64_encoded);
    }

    #[tokio::test]
    async fn test_non_numeric_width_uses_height_only() {
        let state = AppState::new(
            MemoryStore::with("images.story.io", png(400, 200)),
            &Config::default(),
        );

        let resp = state.handle("/images.story.io", Some("wide"), Some("50")).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(body_dimensions(&resp), (100, 50));
    }

    #[tokio::test]
    async fn test_height_only_never_upscales() {
        let state = AppState::new(
            MemoryStore::with("images.story.io", png(100, 50)),
            &Config::default(),
        );

        let resp = state.handle("/images.story.io", None, Some("500")).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(body_dimensions(&resp), (100, 50));
    }

    #[tokio::test]
    async fn test_derived_size_over_limit_is_bad_request() {
        let config =
            Config::from_lookup(|name| (name == "MAX_DIMENSION").then(|| "100".to_string()));
        let state = AppState::new(
            MemoryStore::with("images.story.io", png(400, 40)),
            &config,
        );

        let resp = state.handle("/images.story.io", None, Some("30")).await;
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.body, "Bad Request");
        assert!(!resp.is_base64_encoded);
    }
}
