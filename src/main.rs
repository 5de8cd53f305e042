//! Coverbot CLI entry point.
//!
//! `start` runs the Telegram bot, `check-config` prints the effective
//! configuration, and `ogg2mp3` converts Ogg Vorbis files to MP3 offline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use coverbot::config::{config_dir, Config};
use coverbot::ogg2mp3::Ogg2Mp3;
use coverbot::store::{SessionStore, Store};

/// Coverbot: music tag editor and media converter for Telegram.
#[derive(Parser)]
#[command(name = "coverbot", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Run the Telegram bot until Ctrl+C.
    Start,
    /// Print the effective configuration and exit.
    CheckConfig,
    /// Convert Ogg Vorbis files to MP3 with ogg123 and lame.
    Ogg2mp3 {
        /// Directory for the MP3 files (default: next to each input).
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,
        /// LAME VBR quality, 0 (best) to 9.
        #[arg(short = 'V', long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=9))]
        quality: u8,
        /// Input files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Start => handle_start().await,
        Command::CheckConfig => handle_check_config(),
        Command::Ogg2mp3 {
            output_dir,
            quality,
            files,
        } => handle_ogg2mp3(output_dir, quality, &files).await,
    }
}

/// Run the bot.
async fn handle_start() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let base = config_dir()?;

    let _logging_guard = coverbot::logging::init_production(&config.storage.logs_dir(&base))?;

    let downloads_dir = config.storage.downloads_dir(&base);
    std::fs::create_dir_all(&downloads_dir)
        .with_context(|| format!("failed to create {}", downloads_dir.display()))?;

    let db_path = config.storage.database(&base);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let store = Store::open(&db_path)
        .await
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    info!(path = %db_path.display(), "database opened");

    let token = config.bot_token()?;
    let sessions = Arc::new(SessionStore::new(store));

    info!(
        downloads = %downloads_dir.display(),
        ffmpeg = %config.media.ffmpeg_path,
        "coverbot starting"
    );
    coverbot::telegram::run_telegram(&token, Arc::new(config), sessions, downloads_dir).await?;
    info!("coverbot stopped");
    Ok(())
}

/// Print the configuration after file and environment overrides.
fn handle_check_config() -> anyhow::Result<()> {
    coverbot::logging::init_cli();
    let config = Config::load().context("failed to load configuration")?;
    let rendered = toml::to_string_pretty(&config).context("failed to render configuration")?;
    println!("{rendered}");
    match config.bot_token() {
        Ok(_) => println!("# {} is set", config.telegram.bot_token_env),
        Err(e) => println!("# warning: {e}"),
    }
    Ok(())
}

/// Convert each input file, printing the written paths.
async fn handle_ogg2mp3(
    output_dir: Option<PathBuf>,
    quality: u8,
    files: &[PathBuf],
) -> anyhow::Result<()> {
    coverbot::logging::init_cli();
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let converter = Ogg2Mp3 {
        vbr_quality: quality,
        output_dir,
        ..Ogg2Mp3::default()
    };
    for mp3 in converter.convert_all(files).await? {
        println!("{}", mp3.display());
    }
    Ok(())
}
