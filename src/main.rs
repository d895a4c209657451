use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};

use castpress::config::AppConfig;
use castpress::core::voices::VoiceMap;
use castpress::pipeline::Pipeline;
use castpress::publish::{DriverPublisher, SessionStore};

/// Castpress - turn narration scripts into published podcast episodes
#[derive(Parser, Debug)]
#[command(name = "castpress")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a script document into a published episode
    Run {
        /// Path to the script document
        document: PathBuf,

        /// Voice name; defaults to the configured default voice
        voice: Option<String>,
    },

    /// List the configured voices and their speaker ids
    Voices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration from file or environment
    let config = if let Some(config_path) = &cli.config {
        println!("Loading configuration from {}", config_path.display());
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    match cli.command {
        Commands::Voices => {
            let voices = VoiceMap::new(config.voices.clone());
            println!("Configured voices ({}):", voices.len());
            for (name, speaker_id) in voices.entries() {
                println!("  {name}  ->  {}", abbreviate(speaker_id));
            }
            Ok(())
        }

        Commands::Run { document, voice } => {
            let voice_name = voice
                .or_else(|| config.default_voice.clone())
                .ok_or_else(|| {
                    anyhow!("no voice name given and no default_voice configured")
                })?;

            let session = SessionStore::new(config.session_dir.clone());
            let publisher = DriverPublisher::new(config.publish_program.clone(), session)
                .with_args(config.publish_args.clone());
            let pipeline = Pipeline::from_config(&config, publisher)?;

            let result = pipeline.run(&document, &voice_name).await?;

            println!(
                "Published '{}' ({} bytes, {} description chars)",
                result.title, result.artifact.bytes, result.description_chars
            );
            println!("Audio artifact: {}", result.artifact.path.display());
            Ok(())
        }
    }
}

/// Shortens long opaque speaker ids for listing output.
fn abbreviate(id: &str) -> String {
    if id.chars().count() > 30 {
        let head: String = id.chars().take(30).collect();
        format!("{head}...")
    } else {
        id.to_string()
    }
}
