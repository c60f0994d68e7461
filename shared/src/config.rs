use std::collections::HashSet;
use std::env;

const DEFAULT_BUCKET_NAME: &str = "s3.images.story.io";
const DEFAULT_ALLOWED_HOSTS: &str = "images.story.io";
const DEFAULT_JPEG_QUALITY: u8 = 95;
const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Deploy-time settings, read once at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket_name: String,
    pub allowed_hosts: HashSet<String>,
    pub jpeg_quality: u8,
    pub max_dimension: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from the Lambda environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_name = lookup("BUCKET_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string());

        let allowed_hosts = parse_hosts(
            &lookup("ALLOWED_HOSTS").unwrap_or_else(|| DEFAULT_ALLOWED_HOSTS.to_string()),
        );

        let jpeg_quality = lookup("JPEG_QUALITY")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|q| q.clamp(1, 100) as u8)
            .unwrap_or(DEFAULT_JPEG_QUALITY);

        let max_dimension = lookup("MAX_DIMENSION")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_MAX_DIMENSION);

        Self {
            bucket_name,
            allowed_hosts,
            jpeg_quality,
            max_dimension,
        }
    }
}

fn parse_hosts(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}
