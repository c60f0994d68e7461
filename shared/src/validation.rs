use std::collections::HashSet;
use std::num::IntErrorKind;

use crate::config::Config;
use crate::error::ResizeError;

/// A request that passed validation. Either dimension may be zero, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    pub bucket: String,
    pub object_key: String,
    pub width: u32,
    pub height: u32,
}

/// Checks the inbound path against the host allow-list and parses dimensions
#[derive(Debug, Clone)]
pub struct RequestValidator {
    bucket: String,
    allowed_hosts: HashSet<String>,
    max_dimension: u32,
}

impl RequestValidator {
    pub fn new(config: &Config) -> Self {
        Self {
            bucket: config.bucket_name.clone(),
            allowed_hosts: config.allowed_hosts.clone(),
            max_dimension: config.max_dimension,
        }
    }

    pub fn validate(
        &self,
        path: &str,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Result<ResizeRequest, ResizeError> {
        let raw_width = parse_dimension(width);
        let raw_height = parse_dimension(height);

        if !self.is_allowed(path) {
            return Err(ResizeError::InvalidHost(path.to_string()));
        }

        let invalid = || ResizeError::InvalidDimensions {
            width: raw_width,
            height: raw_height,
        };

        if raw_width <= 0 && raw_height <= 0 {
            return Err(invalid());
        }

        let width = clamp_dimension(raw_width);
        let height = clamp_dimension(raw_height);
        if width > self.max_dimension || height > self.max_dimension {
            return Err(invalid());
        }

        Ok(ResizeRequest {
            bucket: self.bucket.clone(),
            object_key: path.trim_start_matches('/').to_string(),
            width,
            height,
        })
    }

    /// Exact match of the path's first segment against the allow-list
    fn is_allowed(&self, path: &str) -> bool {
        host_of(path)
            .map(|host| self.allowed_hosts.contains(&host.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

fn host_of(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Missing or non-numeric values count as zero; out-of-range numbers saturate
pub fn parse_dimension(value: Option<&str>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    match value.parse::<i64>() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

fn clamp_dimension(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
