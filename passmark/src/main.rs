use std::path::PathBuf;

use clap::Parser;

mod app;
mod config;
mod page;
mod utils;

use app::App;
use config::Config;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// File containing the passage text to mark up
    passage: PathBuf,

    /// Override the configuration directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the finished quiz record
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::get(cli.config)?;
    let passage = std::fs::read_to_string(&cli.passage)?;
    let output = cli
        .output
        .or_else(|| config.settings.output_path.clone())
        .unwrap_or_else(|| PathBuf::from("quiz.toml"));

    App::new(config, passage, output).run()?;

    Ok(())
}
