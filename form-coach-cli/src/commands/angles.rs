use anyhow::Result;
use clap::Args;
use form_coach::services::angle_catalog::{compute_angle_series, compute_statistics};
use form_coach::services::{snapshot, AngleCatalog, KeypointProcessor};
use form_coach::JointMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::output::{render_statistics, to_json, OutputFormat};

#[derive(Args)]
pub struct AnglesCommand {
    /// Detector output: JSON object of frame index to joint list
    input: PathBuf,

    /// Comma-separated angle names (defaults to every supported angle)
    #[arg(short, long, value_delimiter = ',')]
    names: Vec<String>,

    /// Save the angle series as a JSON snapshot
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Minimum detector confidence for a joint to count as observed
    #[arg(long)]
    confidence: Option<f64>,
}

impl AnglesCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let pipeline = config.pipeline(self.confidence)?;
        let joints = JointMap::blaze_pose();

        let names: Vec<String> = if self.names.is_empty() {
            AngleCatalog::supported_names().map(str::to_string).collect()
        } else {
            self.names
        };
        let angles = AngleCatalog::new(&joints).resolve_all(&names)?;

        let frames = snapshot::load_detector_frames(&self.input)?;
        let landmarks = KeypointProcessor::new()
            .with_min_confidence(pipeline.confidence_threshold)
            .process(&frames)?;
        let series = compute_angle_series(&landmarks, &angles);

        if let Some(path) = &self.save {
            snapshot::save_angles(path, &series)?;
            tracing::info!(path = %path.display(), angles = series.len(), "Saved angle snapshot");
        }

        let statistics = compute_statistics(&series);
        match self.format.unwrap_or(config.output.format) {
            OutputFormat::Text => print!("{}", render_statistics(&statistics)),
            OutputFormat::Json => println!("{}", to_json(&statistics)?),
        }

        Ok(())
    }
}
