//! `ffmpeg` conversions.
//!
//! Argument lists are built by pure functions so they can be checked
//! without the binary installed; [`Transcoder`] runs them.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::cut::CutRange;
use super::process::{run_tool, ToolError};
use crate::config::MediaConfig;

/// Output path next to `input`: `<dir>/<stem>.<suffix>.<ext>`.
pub fn output_path(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    input.with_file_name(format!("{stem}.{suffix}.{ext}"))
}

fn args<I, S>(parts: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    parts.into_iter().map(|p| p.as_ref().to_owned()).collect()
}

/// Square-crop, scale and trim a video into a Telegram circular note.
pub fn video_note_args(media: &MediaConfig, input: &Path, output: &Path) -> Vec<OsString> {
    let size = media.video_note_size;
    let filter = format!("crop='min(iw,ih)':'min(iw,ih)',scale={size}:{size}");
    let max_secs = media.video_note_max_secs.to_string();
    args([
        OsStr::new("-y"),
        OsStr::new("-i"),
        input.as_os_str(),
        OsStr::new("-t"),
        OsStr::new(&max_secs),
        OsStr::new("-vf"),
        OsStr::new(&filter),
        OsStr::new("-c:v"),
        OsStr::new("libx264"),
        OsStr::new("-preset"),
        OsStr::new("veryfast"),
        OsStr::new("-pix_fmt"),
        OsStr::new("yuv420p"),
        OsStr::new("-c:a"),
        OsStr::new("aac"),
        OsStr::new("-movflags"),
        OsStr::new("+faststart"),
        output.as_os_str(),
    ])
}

/// First seconds of a video as a looping palette-optimised GIF.
pub fn gif_args(media: &MediaConfig, input: &Path, output: &Path) -> Vec<OsString> {
    let filter = format!(
        "fps={},scale={}:-1:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse",
        media.gif_fps, media.gif_width
    );
    let seconds = media.gif_seconds.to_string();
    args([
        OsStr::new("-y"),
        OsStr::new("-t"),
        OsStr::new(&seconds),
        OsStr::new("-i"),
        input.as_os_str(),
        OsStr::new("-vf"),
        OsStr::new(&filter),
        OsStr::new("-loop"),
        OsStr::new("0"),
        output.as_os_str(),
    ])
}

/// Voice message (ogg/opus) to mp3.
pub fn voice_to_audio_args(input: &Path, output: &Path) -> Vec<OsString> {
    args([
        OsStr::new("-y"),
        OsStr::new("-i"),
        input.as_os_str(),
        OsStr::new("-vn"),
        OsStr::new("-c:a"),
        OsStr::new("libmp3lame"),
        OsStr::new("-q:a"),
        OsStr::new("2"),
        output.as_os_str(),
    ])
}

/// Music to an ogg/opus voice message.
pub fn audio_to_voice_args(media: &MediaConfig, input: &Path, output: &Path) -> Vec<OsString> {
    args([
        OsStr::new("-y"),
        OsStr::new("-i"),
        input.as_os_str(),
        OsStr::new("-vn"),
        OsStr::new("-c:a"),
        OsStr::new("libopus"),
        OsStr::new("-b:a"),
        OsStr::new(&media.voice_bitrate),
        output.as_os_str(),
    ])
}

/// Copy the `[start, end)` section of a track without re-encoding.
pub fn cut_args(input: &Path, range: CutRange, output: &Path) -> Vec<OsString> {
    let start = range.start.to_string();
    let end = range.end.to_string();
    args([
        OsStr::new("-y"),
        OsStr::new("-i"),
        input.as_os_str(),
        OsStr::new("-ss"),
        OsStr::new(&start),
        OsStr::new("-to"),
        OsStr::new(&end),
        OsStr::new("-map_metadata"),
        OsStr::new("0"),
        OsStr::new("-c"),
        OsStr::new("copy"),
        output.as_os_str(),
    ])
}

/// Runs `ffmpeg` conversions with the configured parameters.
#[derive(Debug, Clone)]
pub struct Transcoder {
    media: MediaConfig,
}

impl Transcoder {
    /// Create a transcoder from the `[media]` config section.
    pub fn new(media: MediaConfig) -> Self {
        Self { media }
    }

    /// The parameters in use.
    pub fn config(&self) -> &MediaConfig {
        &self.media
    }

    /// Run `ffmpeg`; a failed run leaves no partial `output` behind.
    async fn ffmpeg(&self, args: Vec<OsString>, output: PathBuf) -> Result<PathBuf, ToolError> {
        if let Err(e) = run_tool(OsStr::new(&self.media.ffmpeg_path), &args).await {
            match tokio::fs::remove_file(&output).await {
                Ok(()) => debug!(output = %output.display(), "removed partial output"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => warn!(
                    output = %output.display(),
                    error = %err,
                    "failed to remove partial output"
                ),
            }
            return Err(e);
        }
        info!(output = %output.display(), "conversion finished");
        Ok(output)
    }

    /// Convert a video to a circular note. Returns the `.note.mp4` path.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if `ffmpeg` cannot run or fails.
    pub async fn video_to_note(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let output = output_path(input, "note", "mp4");
        self.ffmpeg(video_note_args(&self.media, input, &output), output)
            .await
    }

    /// Convert a video to a GIF. Returns the `.anim.gif` path.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if `ffmpeg` cannot run or fails.
    pub async fn video_to_gif(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let output = output_path(input, "anim", "gif");
        self.ffmpeg(gif_args(&self.media, input, &output), output)
            .await
    }

    /// Convert a voice message to mp3. Returns the `.audio.mp3` path.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if `ffmpeg` cannot run or fails.
    pub async fn voice_to_audio(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let output = output_path(input, "audio", "mp3");
        self.ffmpeg(voice_to_audio_args(input, &output), output)
            .await
    }

    /// Convert music to a voice message. Returns the `.voice.ogg` path.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if `ffmpeg` cannot run or fails.
    pub async fn audio_to_voice(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let output = output_path(input, "voice", "ogg");
        self.ffmpeg(audio_to_voice_args(&self.media, input, &output), output)
            .await
    }

    /// Cut a section out of a track, keeping the container and tags.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if `ffmpeg` cannot run or fails.
    pub async fn cut_audio(&self, input: &Path, range: CutRange) -> Result<PathBuf, ToolError> {
        let ext = input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mp3".to_owned());
        let output = output_path(input, "cut", &ext);
        self.ffmpeg(cut_args(input, range, &output), output).await
    }
}
