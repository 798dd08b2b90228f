use anyhow::{Context, Result};
use form_coach::config::DEFAULT_CONFIDENCE_THRESHOLD;
use form_coach::services::ProfileRegistry;
use form_coach::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Directory of `*.toml` exercise profiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,

    #[serde(default = "default_exercise")]
    pub default_exercise: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_exercise() -> String {
    "squat".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            profiles_dir: None,
            default_exercise: default_exercise(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: default_true(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.form-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".form-coach"))
    }

    /// Get config file path, `explicit` winning over ~/.form-coach/config.toml
    pub fn config_file(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(Self::config_dir()?.join("config.toml")),
        }
    }

    /// Load configuration from file; a missing file means defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_file = Self::config_file(explicit)?;

        if !config_file.exists() {
            tracing::debug!(path = %config_file.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file {}", config_file.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_file.display()))?;

        Ok(config)
    }

    /// Save configuration, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Pipeline settings, with an optional confidence override
    pub fn pipeline(&self, confidence: Option<f64>) -> Result<PipelineConfig> {
        let confidence_threshold = confidence.unwrap_or(self.analysis.confidence_threshold);
        if !(0.0..=1.0).contains(&confidence_threshold) {
            anyhow::bail!(
                "confidence threshold must be within [0, 1], got {}",
                confidence_threshold
            );
        }

        Ok(PipelineConfig {
            confidence_threshold,
            profiles_dir: self.analysis.profiles_dir.clone(),
        })
    }

    /// Check that the stored threshold is usable and the default exercise has a profile
    pub fn validate(&self) -> Result<()> {
        self.pipeline(None)?;

        let registry = ProfileRegistry::load(self.analysis.profiles_dir.as_deref())?;
        registry.get(&self.analysis.default_exercise).with_context(|| {
            format!(
                "default_exercise '{}' has no profile",
                self.analysis.default_exercise
            )
        })?;

        Ok(())
    }

    pub fn exercise_or_default<'a>(&'a self, exercise: Option<&'a str>) -> &'a str {
        exercise.unwrap_or(&self.analysis.default_exercise)
    }
}
