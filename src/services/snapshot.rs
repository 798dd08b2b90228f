//! JSON snapshots of intermediate pipeline data for offline reuse.
//!
//! Every snapshot is wrapped as `{ version, created_at, data }` with `data`
//! keyed by frame index. Undefined angles are written as `null`.

use crate::models::angles::AngleSeriesSet;
use crate::models::keypoint::{DetectorFrames, FrameIndex, LandmarkSequence};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub data: T,
}

impl<T> Snapshot<T> {
    pub fn new(data: T) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now(),
            data,
        }
    }
}

type StoredAngles = BTreeMap<String, BTreeMap<FrameIndex, Option<f64>>>;

fn write_snapshot<T: Serialize>(path: &Path, data: T) -> Result<()> {
    let json = serde_json::to_string_pretty(&Snapshot::new(data))
        .context("Failed to serialize snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;

    debug!(path = %path.display(), "Saved snapshot");
    Ok(())
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Snapshot<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot<T> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    if snapshot.version > SNAPSHOT_VERSION {
        anyhow::bail!(
            "Snapshot {} has version {}, newest supported is {}",
            path.display(),
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }

    Ok(snapshot)
}

pub fn save_landmarks(path: &Path, landmarks: &LandmarkSequence) -> Result<()> {
    write_snapshot(path, landmarks)
}

pub fn load_landmarks(path: &Path) -> Result<LandmarkSequence> {
    Ok(read_snapshot(path)?.data)
}

pub fn save_angles(path: &Path, angles: &AngleSeriesSet) -> Result<()> {
    let stored: StoredAngles = angles
        .iter()
        .map(|(name, series)| {
            let values = series
                .iter()
                .map(|(&frame, &angle)| (frame, (!angle.is_nan()).then_some(angle)))
                .collect();
            (name.clone(), values)
        })
        .collect();

    write_snapshot(path, stored)
}

pub fn load_angles(path: &Path) -> Result<AngleSeriesSet> {
    let stored: StoredAngles = read_snapshot(path)?.data;

    Ok(stored
        .into_iter()
        .map(|(name, series)| {
            let values = series
                .into_iter()
                .map(|(frame, angle)| (frame, angle.unwrap_or(f64::NAN)))
                .collect();
            (name, values)
        })
        .collect())
}

/// Parse detector output: a JSON object of frame index → list of
/// `{x, y, z, confidence}` (`visibility` is accepted for `confidence`)
pub fn parse_detector_frames(json: &str) -> Result<DetectorFrames> {
    serde_json::from_str(json).context("Failed to parse detector frames")
}

pub fn load_detector_frames(path: &Path) -> Result<DetectorFrames> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read detector frames {}", path.display()))?;
    let frames = parse_detector_frames(&content)
        .with_context(|| format!("Invalid detector frames in {}", path.display()))?;

    debug!(path = %path.display(), frames = frames.len(), "Loaded detector frames");
    Ok(frames)
}
