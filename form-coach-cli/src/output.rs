//! Terminal rendering for reports, segments and statistics

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use form_coach::models::{AnalysisReport, AngleStatistics, FrameIndex, RepetitionSpan, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Apply the color preference for this process
pub fn configure_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

pub fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("{:<4}", severity.to_string());
    match severity {
        Severity::Good => label.green(),
        Severity::Fair => label.yellow(),
        Severity::Bad => label.red().bold(),
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn span_label(span: &RepetitionSpan) -> String {
    format!(
        "Rep {} (frames {}-{}, {} frames)",
        span.index + 1,
        span.start_frame,
        span.end_frame,
        span.frame_count()
    )
}

pub fn render_analysis(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", format!("Exercise: {}", report.exercise).bold());
    let _ = writeln!(
        out,
        "Frames: {}  Repetitions: {}  Skipped: {}",
        report.total_frames,
        report.rep_count(),
        report.skipped.len()
    );
    let _ = writeln!(out, "────────────────────────────────");

    if report.no_repetitions_detected() {
        let _ = writeln!(out, "No repetitions detected.");
    }

    for rep in &report.repetitions {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}  [{}]", span_label(&rep.span).bold(), rep.clip_id);
        for (category, advice) in rep.report.iter() {
            let _ = writeln!(
                out,
                "  {} {:<28} {}",
                severity_label(advice.severity),
                category,
                advice.text
            );
        }
    }

    for skipped in &report.skipped {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}  {}",
            span_label(&skipped.span).dimmed(),
            format!("skipped: {}", skipped.reason).yellow()
        );
    }

    out
}

pub fn render_segments(boundaries: &[FrameIndex], spans: &[RepetitionSpan]) -> String {
    let mut out = String::new();

    let listed: Vec<String> = boundaries.iter().map(FrameIndex::to_string).collect();
    let _ = writeln!(out, "Boundaries: {}", listed.join(", "));
    for span in spans {
        let _ = writeln!(out, "  {}", span_label(span));
    }

    out
}

pub fn render_statistics(statistics: &BTreeMap<String, AngleStatistics>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<28} {:>8} {:>8} {:>8} {:>8} {:>9}",
        "angle", "mean", "std", "min", "max", "frames"
    );
    for (name, stats) in statistics {
        let _ = writeln!(
            out,
            "{:<28} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>4}/{:<4}",
            name,
            stats.mean,
            stats.std_dev,
            stats.min,
            stats.max,
            stats.defined_frames,
            stats.total_frames
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_coach::models::{Advice, CorrectionReport, RepetitionReport};

    fn sample_report() -> AnalysisReport {
        let mut report = CorrectionReport::new();
        report.insert("squat_depth", Advice::good("You depth is good."));

        AnalysisReport {
            id: Default::default(),
            exercise: "squat".to_string(),
            generated_at: Default::default(),
            total_frames: 28,
            boundaries: vec![0, 27],
            repetitions: vec![RepetitionReport {
                span: RepetitionSpan {
                    index: 0,
                    start_frame: 0,
                    end_frame: 27,
                },
                clip_id: "rep-001_f0-f27".to_string(),
                report,
            }],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_render_analysis_lists_advice() {
        colored::control::set_override(false);
        let text = render_analysis(&sample_report());

        assert!(text.contains("Rep 1 (frames 0-27, 28 frames)"));
        assert!(text.contains("rep-001_f0-f27"));
        assert!(text.contains("good squat_depth"));
        assert!(text.contains("You depth is good."));
    }

    #[test]
    fn test_output_format_parses_lowercase() {
        let config: BTreeMap<String, OutputFormat> = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(config["format"], OutputFormat::Json);
    }
}
