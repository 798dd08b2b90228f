use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Args)]
pub struct InitCommand {
    /// Overwrite existing config
    #[arg(short, long)]
    force: bool,

    /// Minimum detector confidence to store, within [0, 1]
    #[arg(long)]
    confidence: Option<f64>,

    /// Exercise analyzed when a command names none
    #[arg(short, long)]
    exercise: Option<String>,

    /// Directory of exercise profile TOML files
    #[arg(long)]
    profiles_dir: Option<PathBuf>,
}

impl InitCommand {
    pub fn execute(self, explicit: Option<&Path>) -> Result<()> {
        let config_file = Config::config_file(explicit)?;

        if config_file.exists() && !self.force {
            println!(
                "{} already exists, pass --force to replace it",
                config_file.display()
            );
            return Ok(());
        }

        let mut config = Config::default();
        if let Some(confidence) = self.confidence {
            config.analysis.confidence_threshold = confidence;
        }
        if let Some(exercise) = self.exercise {
            config.analysis.default_exercise = exercise;
        }
        config.analysis.profiles_dir = self.profiles_dir;

        // nothing is written unless the analysis settings would load
        config.validate()?;
        config.save(&config_file)?;
        tracing::info!(path = %config_file.display(), "Wrote configuration");

        println!("✓ Configuration written to {}", config_file.display());
        print!("{}", render_config(&config));

        Ok(())
    }
}

pub fn show_config(config: &Config, explicit: Option<&Path>) -> Result<()> {
    let config_file = Config::config_file(explicit)?;
    let source = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("built-in defaults (no file at {})", config_file.display())
    };

    println!("{} {}", "Source:".bold(), source);
    print!("{}", render_config(config));

    if let Err(err) = config.validate() {
        println!("{} {:#}", "warning:".yellow().bold(), err);
    }

    Ok(())
}

/// `[analysis]` and `[output]` as key/value lines
fn render_config(config: &Config) -> String {
    let analysis = &config.analysis;
    let profiles_dir = analysis
        .profiles_dir
        .as_ref()
        .map(|dir| format!("{:?}", dir.display().to_string()))
        .unwrap_or_else(|| "none (built-in profiles only)".to_string());
    let format = config
        .output
        .format
        .to_possible_value()
        .map(|value| value.get_name().to_string())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "\n[analysis]");
    let _ = writeln!(out, "  confidence_threshold = {}", analysis.confidence_threshold);
    let _ = writeln!(out, "  default_exercise = {:?}", analysis.default_exercise);
    let _ = writeln!(out, "  profiles_dir = {}", profiles_dir);
    let _ = writeln!(out, "\n[output]");
    let _ = writeln!(out, "  format = {}", format);
    let _ = writeln!(out, "  color = {}", config.output.color);
    out
}
