//! Downloads from Telegram and the per-user file layout.
//!
//! Every user gets `{downloads_dir}/{user_id}/`; files inside are named
//! with a random UUID so a new upload never overwrites one still in use.

use std::path::{Path, PathBuf};

use anyhow::Context;
use teloxide::net::Download;
use teloxide::prelude::*;
use tokio::io::AsyncWriteExt;
use teloxide::types::{Audio, PhotoSize};
use tracing::{debug, warn};

/// Directory holding one user's files.
pub fn user_dir(downloads_dir: &Path, user_id: i64) -> PathBuf {
    downloads_dir.join(user_id.to_string())
}

/// Fresh file path in `dir` with extension `ext`.
pub fn unique_path(dir: &Path, ext: &str) -> PathBuf {
    dir.join(format!("{}.{ext}", uuid::Uuid::new_v4()))
}

/// Path the cover extracted from `audio_path` is saved to.
pub fn artwork_path(audio_path: &Path) -> PathBuf {
    let mut name = audio_path.as_os_str().to_owned();
    name.push(".jpg");
    PathBuf::from(name)
}

/// File extension for an incoming music file.
///
/// Prefers the extension of the original file name, then the MIME type,
/// then `mp3`.
pub fn audio_extension(audio: &Audio) -> String {
    let from_name = audio
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);
    if let Some(ext) = from_name {
        return ext;
    }
    let mime = audio
        .mime_type
        .as_ref()
        .map(|m| m.essence_str().to_owned())
        .unwrap_or_default();
    extension_for_mime(&mime).to_owned()
}

/// Extension for an audio MIME type, `mp3` when unknown.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "audio/mp4" | "audio/x-m4a" | "audio/m4a" => "m4a",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/aac" => "aac",
        _ => "mp3",
    }
}

/// Largest size of a photo (last by Telegram convention).
pub fn largest_photo(photos: &[PhotoSize]) -> Option<&PhotoSize> {
    photos.last()
}

/// Download a file from Telegram by file ID and write it to `dest`.
///
/// Creates the parent directory if it does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the download
/// fails.
pub async fn download_telegram_file(
    bot: &Bot,
    file_id: &str,
    dest: &Path,
) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create user directory: {}", parent.display()))?;
    }

    let file = bot
        .get_file(file_id)
        .await
        .context("failed to get file info from Telegram")?;

    let mut dst = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("failed to create file at {}", dest.display()))?;

    bot.download_file(&file.path, &mut dst)
        .await
        .context("failed to download file from Telegram")?;
    // Queued writes must land before the file is read elsewhere.
    dst.flush()
        .await
        .with_context(|| format!("failed to flush {}", dest.display()))?;

    debug!(path = %dest.display(), "media file downloaded");
    Ok(())
}

/// Delete files the conversation no longer needs. Missing files are fine.
pub async fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "removed file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove file"),
        }
    }
}
