use anyhow::Result;
use clap::Args;
use form_coach::services::snapshot;
use std::path::PathBuf;

use super::build_analyzer;
use crate::config::Config;
use crate::output::{render_analysis, to_json, OutputFormat};

#[derive(Args)]
pub struct AnalyzeCommand {
    /// Detector output: JSON object of frame index to joint list
    input: PathBuf,

    /// Exercise profile name (defaults to the configured exercise)
    #[arg(short, long)]
    exercise: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Minimum detector confidence for a joint to count as observed
    #[arg(long)]
    confidence: Option<f64>,
}

impl AnalyzeCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let analyzer = build_analyzer(config, self.exercise.as_deref(), self.confidence)?;
        let frames = snapshot::load_detector_frames(&self.input)?;
        let report = analyzer.analyze(&frames)?;

        match self.format.unwrap_or(config.output.format) {
            OutputFormat::Text => print!("{}", render_analysis(&report)),
            OutputFormat::Json => println!("{}", to_json(&report)?),
        }

        Ok(())
    }
}
