//! pigment-atlas CLI tool

use anyhow::Result;
use clap::{Parser, Subcommand};
use pigment_atlas::config::AtlasConfig;
use pigment_atlas_cli::{BuildCommand, ConfigCommand, ImportCommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pigment-atlas")]
#[command(version)]
#[command(about = "Static hypertext atlas of watercolor paints and pigments", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./pigment-atlas.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the database contents with a scraper document
    Import {
        /// Scraper JSON: manufacturer -> [{paint -> [[code, name], ...]}]
        json: PathBuf,
        /// JSON array of pigment descriptions and reference links
        #[arg(long)]
        notes: Option<PathBuf>,
    },
    /// Generate the static site
    Build {
        /// Build from a scraper document instead of the database
        #[arg(long)]
        json: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// URL prefix for every internal link
        #[arg(long)]
        root_path: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AtlasConfig::load_from(path)?,
        None => AtlasConfig::load()?,
    };
    pigment_atlas::observability::init(&config.logging)?;

    match cli.command {
        Commands::Import { json, notes } => {
            let cmd = ImportCommand::new(json, notes)?;
            cmd.execute(&config).await?;
        }
        Commands::Build { json, output, root_path } => {
            let cmd = BuildCommand { json, output, root_path };
            cmd.execute(&config).await?;
        }
        Commands::Config => {
            ConfigCommand::execute(&config)?;
        }
    }

    Ok(())
}
