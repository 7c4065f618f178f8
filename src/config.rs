//! Runtime configuration.
//!
//! Loaded once by the binary and passed down explicitly; the pipeline
//! stages never read the environment themselves.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://opensky-network.org/api/states/all";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// OpenSky `states/all` endpoint.
    pub api_url: String,
    /// When set, artifacts go to this bucket instead of `output_dir`.
    pub s3_bucket: Option<String>,
    pub aws_region: Option<String>,
    /// Root directory for local artifacts.
    pub output_dir: PathBuf,
    pub raw_prefix: String,
    pub processed_prefix: String,
    pub analysis_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            s3_bucket: None,
            aws_region: None,
            output_dir: PathBuf::from("data"),
            raw_prefix: "raw_files".to_string(),
            processed_prefix: "processed".to_string(),
            analysis_prefix: "analysis".to_string(),
        }
    }
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_url: get("OPENSKY_API_URL").unwrap_or(defaults.api_url),
            s3_bucket: get("S3_BUCKET_NAME").or_else(|| get("S3_BUCKET")),
            aws_region: get("AWS_REGION"),
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            raw_prefix: get("RAW_PREFIX").unwrap_or(defaults.raw_prefix),
            processed_prefix: get("PROCESSED_PREFIX").unwrap_or(defaults.processed_prefix),
            analysis_prefix: get("ANALYSIS_PREFIX").unwrap_or(defaults.analysis_prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("S3_BUCKET_NAME", "flights"),
            ("AWS_REGION", "eu-central-1"),
            ("OUTPUT_DIR", "/tmp/out"),
            ("PROCESSED_PREFIX", "clean"),
        ]));

        assert_eq!(config.s3_bucket.as_deref(), Some("flights"));
        assert_eq!(config.aws_region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.processed_prefix, "clean");
        assert_eq!(config.raw_prefix, "raw_files");
    }

    #[test]
    fn test_bucket_fallback_and_blank_values() {
        let config = Config::from_lookup(lookup(&[("S3_BUCKET", "legacy"), ("AWS_REGION", "  ")]));

        assert_eq!(config.s3_bucket.as_deref(), Some("legacy"));
        assert_eq!(config.aws_region, None);
    }
}
