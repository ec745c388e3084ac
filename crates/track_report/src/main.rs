//! Track Report CLI
//!
//! Tracker CSV → player metrics CSV + team/player heatmaps

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use track_core::{input::TrackFileFormat, AnalysisConfig, TrackId};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "track_report")]
#[command(about = "Player movement metrics and heatmaps from tracker output", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Metrics CSV, heatmap samples and heatmaps from a tracker CSV
    Analyze {
        /// Tracker output CSV
        #[arg(long)]
        tracks: PathBuf,

        /// Row layout: xyxy or mot
        #[arg(long, default_value = "xyxy")]
        format: TrackFileFormat,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// YAML or JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override kinematics.fps
        #[arg(long)]
        fps: Option<f64>,

        /// Override kinematics.pixel_to_meter
        #[arg(long)]
        pixel_to_meter: Option<f64>,

        /// Only draw this player's heatmap
        #[arg(long)]
        player: Option<TrackId>,
    },

    /// Redraw heatmaps from a heatmap samples CSV
    Heatmap {
        /// Samples CSV (player_id,x,y,frame)
        #[arg(long)]
        samples: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// YAML or JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only draw this player's heatmap
        #[arg(long)]
        player: Option<TrackId>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            tracks,
            format,
            out,
            config,
            fps,
            pixel_to_meter,
            player,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(fps) = fps {
                config.kinematics.fps = fps;
            }
            if let Some(factor) = pixel_to_meter {
                config.kinematics.pixel_to_meter = factor;
            }
            if player.is_some() {
                config.heatmap.identity_filter = player;
            }

            println!("Analyzing tracker output...");
            println!("   Input:  {}", tracks.display());
            println!("   Output: {}", out.display());

            let summary = track_report::run_analysis(&config, &tracks, format, &out)?;

            println!("\nDone.");
            println!("   Frames:     {}", summary.frames_processed);
            println!("   Players:    {}", summary.identities.len());
            println!("   Metrics:    {}", summary.metrics_csv.display());
            println!("   Samples:    {}", summary.samples_csv.display());
            print_heatmaps(&summary.heatmaps);
        }

        Commands::Heatmap {
            samples,
            out,
            config,
            player,
        } => {
            let mut config = load_config(config.as_ref())?;
            if player.is_some() {
                config.heatmap.identity_filter = player;
            }

            println!("Rendering heatmaps...");
            println!("   Samples: {}", samples.display());
            println!("   Output:  {}", out.display());

            let heatmaps = track_report::render_from_samples(&config, &samples, &out)?;
            print_heatmaps(&heatmaps);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

#[cfg(feature = "cli")]
fn print_heatmaps(heatmaps: &track_report::HeatmapSummary) {
    println!("   Heatmaps:   {} written", heatmaps.written.len());
    for path in &heatmaps.written {
        println!("      {}", path.display());
    }
    for skipped in &heatmaps.skipped {
        println!("   Skipped {}: {}", skipped.title, skipped.reason);
    }
    for failed in &heatmaps.failed {
        println!("   Failed: {}", failed);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("track_report CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
