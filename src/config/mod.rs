use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Analysis pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Detector confidence below which a joint counts as missing
    pub confidence_threshold: f64,
    /// Directory of `*.toml` exercise profiles overlaying the built-ins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            profiles_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let confidence_threshold = match env::var("FORM_COACH_CONFIDENCE_THRESHOLD") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid FORM_COACH_CONFIDENCE_THRESHOLD '{}'", value))?,
            Err(_) => DEFAULT_CONFIDENCE_THRESHOLD,
        };
        let profiles_dir = env::var("FORM_COACH_PROFILES_DIR").ok().map(PathBuf::from);

        Self {
            confidence_threshold,
            profiles_dir,
        }
        .validated()
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            );
        }
        Ok(self)
    }
}
