mod analyze;
mod angles;
mod config_cmd;
mod profiles;
mod segment;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use form_coach::{ExerciseAnalyzer, JointMap};
use std::path::PathBuf;

use crate::config::Config;
use crate::output::configure_color;

pub use analyze::AnalyzeCommand;
pub use angles::AnglesCommand;
pub use config_cmd::InitCommand;
pub use segment::SegmentCommand;

#[derive(Parser)]
#[command(name = "form-coach")]
#[command(about = "Exercise repetition segmentation and form correction from pose landmarks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FORM_COACH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a recording into repetitions and grade each one
    Analyze(AnalyzeCommand),

    /// Show repetition boundaries only
    Segment(SegmentCommand),

    /// Compute named angle series and their statistics
    Angles(AnglesCommand),

    /// Inspect exercise profiles
    #[command(subcommand)]
    Profiles(ProfilesSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ProfilesSubcommands {
    /// List built-in and configured profiles
    List,

    /// Print a profile as TOML
    Show {
        /// Exercise name, e.g. squat or bicep_curl
        name: String,
    },

    /// Write a profile to a TOML file for tuning
    Export {
        /// Exercise name
        name: String,

        /// Output file (defaults to <name>.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Write a validated configuration file
    Init(InitCommand),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config_path = self.config.as_deref();
        let config = Config::load(config_path)?;
        configure_color(config.output.color);

        tracing::debug!(verbose = self.verbose, "Loaded configuration");

        match self.command {
            Commands::Analyze(cmd) => cmd.execute(&config),
            Commands::Segment(cmd) => cmd.execute(&config),
            Commands::Angles(cmd) => cmd.execute(&config),
            Commands::Profiles(subcmd) => match subcmd {
                ProfilesSubcommands::List => profiles::list_profiles(&config),
                ProfilesSubcommands::Show { name } => profiles::show_profile(&config, &name),
                ProfilesSubcommands::Export { name, output } => {
                    profiles::export_profile(&config, &name, output)
                }
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&config, config_path),
                ConfigSubcommands::Init(cmd) => cmd.execute(config_path),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Analyzer for `exercise` (or the configured default) with CLI overrides applied
fn build_analyzer(config: &Config, exercise: Option<&str>, confidence: Option<f64>) -> Result<ExerciseAnalyzer> {
    let pipeline = config.pipeline(confidence)?;
    let exercise = config.exercise_or_default(exercise);

    ExerciseAnalyzer::from_config(&JointMap::blaze_pose(), &pipeline, exercise)
        .with_context(|| format!("Failed to set up analysis for '{}'", exercise))
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
