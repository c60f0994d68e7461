use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;

use crate::storage::ObjectMetadata;

/// Same layout as `net/http`'s `TimeFormat`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// API Gateway proxy integration response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ResponseEnvelope {
    /// 200 with a base64 JPEG body and the source object's caching headers
    pub fn jpeg(jpeg_bytes: &[u8], metadata: &ObjectMetadata) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "image/jpeg".to_string());
        if let Some(cache_control) = &metadata.cache_control {
            headers.insert("Cache-Control".to_string(), cache_control.clone());
        }
        if let Some(last_modified) = &metadata.last_modified {
            headers.insert("Last-Modified".to_string(), http_date(last_modified));
        }
        if let Some(etag) = &metadata.etag {
            headers.insert("ETag".to_string(), etag.clone());
        }

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: STANDARD.encode(jpeg_bytes),
            is_base64_encoded: true,
        }
    }

    /// Plain-text response whose body is just the status phrase
    pub fn error(status: StatusCode) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());

        Self {
            status_code: status.as_u16(),
            headers,
            body: status.canonical_reason().unwrap_or_default().to_string(),
            is_base64_encoded: false,
        }
    }
}

pub fn http_date(dt: &DateTime<Utc>) -> String {
    dt.format(HTTP_DATE_FORMAT).to_string()
}
