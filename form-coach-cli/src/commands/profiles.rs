use anyhow::{Context, Result};
use form_coach::services::{CorrectionEngine, ProfileRegistry};
use form_coach::JointMap;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

fn registry(config: &Config) -> Result<ProfileRegistry> {
    ProfileRegistry::load(config.analysis.profiles_dir.as_deref())
}

pub fn list_profiles(config: &Config) -> Result<()> {
    let registry = registry(config)?;
    let joints = JointMap::blaze_pose();

    println!("Exercise Profiles");
    println!("────────────────────────────────");
    for profile in registry.profiles() {
        let status = match CorrectionEngine::compile(&joints, profile) {
            Ok(_) => String::new(),
            Err(err) => format!("  (invalid: {})", err),
        };
        println!(
            "{:<16} segments on {:<28} {} categories{}",
            profile.name,
            profile.segmentation_angle,
            profile.categories().len(),
            status
        );
    }

    Ok(())
}

pub fn show_profile(config: &Config, name: &str) -> Result<()> {
    let registry = registry(config)?;
    let profile = registry.get(name)?;
    CorrectionEngine::compile(&JointMap::blaze_pose(), profile)?;

    print!("{}", profile.to_toml_string()?);

    Ok(())
}

pub fn export_profile(config: &Config, name: &str, output: Option<PathBuf>) -> Result<()> {
    let registry = registry(config)?;
    let profile = registry.get(name)?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.toml", profile.name)));

    fs::write(&path, profile.to_toml_string()?)
        .with_context(|| format!("Failed to write profile to {}", path.display()))?;

    println!("✓ Exported '{}' to: {}", profile.name, path.display());

    Ok(())
}
