mod config;
mod engine;
mod geometry;
mod snowflake;
mod terminal;

use clap::Parser;
use config::{Settings, SnowConfig};
use std::io;

#[derive(Parser)]
#[command(name = "termflake")]
#[command(version)]
#[command(about = "Koch snowflake animation for the terminal", long_about = None)]
struct Cli {
    /// Animation step delay in seconds
    #[arg(short, long)]
    time: Option<f32>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    let config = SnowConfig {
        time_step: cli
            .time
            .or(settings.viz.time_step)
            .unwrap_or(0.1)
            .clamp(0.0, 5.0),
        seed: cli.seed,
    };

    snowflake::run(config)
}
