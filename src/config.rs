//! Configuration types for keira-catalog

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Side length of the RGB565 icon blob, fixed by the device's decoder
pub const ICON_MIN_SIZE: u32 = 64;

/// Source and build tree locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the source tree containing `apps/` and `mods/` (default: ".")
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Build output directory (default: "./build")
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            build_dir: default_build_dir(),
        }
    }
}

/// Maximum pixel dimensions of a raster asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Maximum width in pixels
    pub width: u32,
    /// Maximum height in pixels
    pub height: u32,
}

impl Bounds {
    /// Create new bounds
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether an image of the given size exceeds these bounds in either dimension
    pub fn exceeded_by(&self, width: u32, height: u32) -> bool {
        width > self.width || height > self.height
    }
}

/// Image normalization and transcoding settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Bounds applied to screenshots (default: 1920x1080)
    #[serde(default = "default_screenshot_bounds")]
    pub screenshot_bounds: Bounds,

    /// Bounds applied to icons (default: 512x512)
    #[serde(default = "default_icon_bounds")]
    pub icon_bounds: Bounds,

    /// Quality factor for lossy re-encoding (default: 85)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Files larger than this are re-encoded even when within bounds (default: 500 KiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Side length of the RGB565 icon (must be 64)
    #[serde(default = "default_icon_min_size")]
    pub icon_min_size: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            screenshot_bounds: default_screenshot_bounds(),
            icon_bounds: default_icon_bounds(),
            jpeg_quality: default_jpeg_quality(),
            max_file_bytes: default_max_file_bytes(),
            icon_min_size: default_icon_min_size(),
        }
    }
}

/// Retry behavior for full-content fetches
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// HTTP probe and fetch settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Timeout for reachability probes (default: 10 seconds). Fetches are not bounded.
    #[serde(default = "default_probe_timeout", with = "duration_serde")]
    pub probe_timeout: Duration,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Hosts recognized as source forges; only these are probed for `sources`
    #[serde(default = "default_known_forges")]
    pub known_forges: Vec<String>,

    /// Retry behavior for fetches
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_timeout: default_probe_timeout(),
            user_agent: default_user_agent(),
            known_forges: default_known_forges(),
            retry: RetryConfig::default(),
        }
    }
}

/// Whether assets are only checked or actually written to the build tree
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Probe remote assets and check local ones; never write asset bytes
    Validate,
    /// Probe, then fetch or copy every asset into the build tree (default)
    #[default]
    Materialize,
}

/// Catalog layout settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Number of slugs per paginated index document (default: 12)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Asset handling mode
    #[serde(default)]
    pub mode: FetchMode,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            mode: FetchMode::default(),
        }
    }
}

/// Main configuration for a catalog build
///
/// Every field has a default, so an empty JSON object is a valid configuration file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source and build locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Image normalization and transcoding
    #[serde(default)]
    pub images: ImageConfig,

    /// HTTP probing and fetching
    #[serde(default)]
    pub network: NetworkConfig,

    /// Catalog layout
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(
                "config",
                format!("failed to read '{}': {}", path.display(), e),
            )
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        if self.catalog.page_size == 0 {
            return Err(Error::config(
                "page_size",
                "page size must be greater than zero",
            ));
        }
        if self.images.icon_min_size != ICON_MIN_SIZE {
            return Err(Error::config(
                "icon_min_size",
                format!(
                    "icon_min_size is fixed at {} by the device format, got {}",
                    ICON_MIN_SIZE, self.images.icon_min_size
                ),
            ));
        }
        if self.images.jpeg_quality == 0 || self.images.jpeg_quality > 100 {
            return Err(Error::config(
                "jpeg_quality",
                format!(
                    "quality must be within 1..=100, got {}",
                    self.images.jpeg_quality
                ),
            ));
        }
        for (key, bounds) in [
            ("screenshot_bounds", self.images.screenshot_bounds),
            ("icon_bounds", self.images.icon_bounds),
        ] {
            if bounds.width == 0 || bounds.height == 0 {
                return Err(Error::config(key, "bounds must be non-zero"));
            }
        }
        if self.network.probe_timeout.is_zero() {
            return Err(Error::config(
                "probe_timeout",
                "probe timeout must be greater than zero",
            ));
        }
        let multiplier = self.network.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(Error::config(
                "backoff_multiplier",
                format!("backoff multiplier must be a finite value >= 1.0, got {multiplier}"),
            ));
        }
        Ok(())
    }

    /// Source tree root
    pub fn source_dir(&self) -> &PathBuf {
        &self.paths.source_dir
    }

    /// Build output root
    pub fn build_dir(&self) -> &PathBuf {
        &self.paths.build_dir
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("./build")
}

fn default_screenshot_bounds() -> Bounds {
    Bounds::new(1920, 1080)
}

fn default_icon_bounds() -> Bounds {
    Bounds::new(512, 512)
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_max_file_bytes() -> u64 {
    500 * 1024
}

fn default_icon_min_size() -> u32 {
    ICON_MIN_SIZE
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("keira-catalog/{}", env!("CARGO_PKG_VERSION"))
}

fn default_known_forges() -> Vec<String> {
    ["github.com", "gitlab.com", "codeberg.org", "bitbucket.org"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_page_size() -> usize {
    12
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.catalog.page_size, 12);
        assert_eq!(config.catalog.mode, FetchMode::Materialize);
        assert_eq!(config.images.screenshot_bounds, Bounds::new(1920, 1080));
        assert_eq!(config.images.icon_bounds, Bounds::new(512, 512));
        assert_eq!(config.images.jpeg_quality, 85);
        assert_eq!(config.images.max_file_bytes, 512_000);
        assert_eq!(config.network.probe_timeout, Duration::from_secs(10));
        assert!(config.network.known_forges.contains(&"github.com".to_string()));
        assert_eq!(config.build_dir(), &PathBuf::from("./build"));
        config.validate().unwrap();
    }

    #[test]
    fn nested_values_override_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "paths": { "build_dir": "/tmp/out" },
                "network": { "probe_timeout": 3, "retry": { "max_attempts": 0 } },
                "catalog": { "page_size": 5, "mode": "validate" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.build_dir(), &PathBuf::from("/tmp/out"));
        assert_eq!(config.source_dir(), &PathBuf::from("."));
        assert_eq!(config.network.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.network.retry.max_attempts, 0);
        assert_eq!(config.network.retry.initial_delay, Duration::from_secs(1));
        assert_eq!(config.catalog.page_size, 5);
        assert_eq!(config.catalog.mode, FetchMode::Validate);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, Error::Config { ref key, .. } if key.as_deref() == Some("page_size")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn icon_min_size_cannot_change() {
        let mut config = Config::default();
        config.images.icon_min_size = 32;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let mut config = Config::default();
        config.images.jpeg_quality = 0;
        assert!(config.validate().is_err());
        config.images.jpeg_quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unusable_backoff_multiplier_is_rejected() {
        for multiplier in [-1.0, 0.5, f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.network.retry.backoff_multiplier = multiplier;
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, Error::Config { ref key, .. } if key.as_deref() == Some("backoff_multiplier")),
                "multiplier {multiplier} gave {err:?}"
            );
        }

        let mut config = Config::default();
        config.network.retry.backoff_multiplier = 1.0;
        config.validate().unwrap();
    }

    #[test]
    fn bounds_exceeded_in_either_dimension() {
        let bounds = Bounds::new(1920, 1080);
        assert!(bounds.exceeded_by(3000, 2000));
        assert!(bounds.exceeded_by(1921, 10));
        assert!(bounds.exceeded_by(10, 1081));
        assert!(!bounds.exceeded_by(1920, 1080));
    }

    #[test]
    fn from_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{ "catalog": { "page_size": 0 } }"#).unwrap();
        assert!(Config::from_file(&path).is_err());

        std::fs::write(&path, r#"{ "catalog": { "page_size": 24 } }"#).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().catalog.page_size, 24);

        assert!(Config::from_file(&dir.path().join("absent.json")).is_err());
    }
}
