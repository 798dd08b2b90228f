use anyhow::Result;
use clap::Args;
use form_coach::models::RepetitionSpan;
use form_coach::services::snapshot;
use serde_json::json;
use std::path::PathBuf;

use super::build_analyzer;
use crate::config::Config;
use crate::output::{render_segments, to_json, OutputFormat};

#[derive(Args)]
pub struct SegmentCommand {
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

impl SegmentCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let analyzer = build_analyzer(config, self.exercise.as_deref(), self.confidence)?;
        let frames = snapshot::load_detector_frames(&self.input)?;
        let session = analyzer.prepare(&frames)?;
        let boundaries = analyzer.boundaries(&session)?;

        let spans: Vec<RepetitionSpan> = boundaries
            .windows(2)
            .enumerate()
            .map(|(index, window)| RepetitionSpan {
                index,
                start_frame: window[0],
                end_frame: window[1],
            })
            .collect();

        match self.format.unwrap_or(config.output.format) {
            OutputFormat::Text => print!("{}", render_segments(&boundaries, &spans)),
            OutputFormat::Json => println!(
                "{}",
                to_json(&json!({ "boundaries": boundaries, "repetitions": spans }))?
            ),
        }

        Ok(())
    }
}
