//! Batch ogg → mp3 conversion through `ogg123` and `lame`.
//!
//! Each input is decoded to a WAV file in a scratch directory, then
//! encoded with LAME's VBR mode. The first failing command aborts the
//! batch.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::media::process::{run_tool, ToolError};

/// Errors from a batch conversion.
#[derive(Debug, thiserror::Error)]
pub enum Ogg2Mp3Error {
    /// `ogg123` or `lame` failed; the message is the command line.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The scratch directory could not be created.
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[from] std::io::Error),

    /// An input path has no file name.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),
}

/// `ogg123 -d wav -f <wav> <ogg>`.
pub fn decode_args(ogg: &Path, wav: &Path) -> Vec<OsString> {
    vec![
        "-d".into(),
        "wav".into(),
        "-f".into(),
        wav.as_os_str().to_owned(),
        ogg.as_os_str().to_owned(),
    ]
}

/// `lame -V <quality> --vbr-new -h <wav> <mp3>`.
pub fn encode_args(wav: &Path, mp3: &Path, vbr_quality: u8) -> Vec<OsString> {
    vec![
        "-V".into(),
        vbr_quality.to_string().into(),
        "--vbr-new".into(),
        "-h".into(),
        wav.as_os_str().to_owned(),
        mp3.as_os_str().to_owned(),
    ]
}

/// Where the mp3 for `input` goes: `<dir>/<stem>.mp3`, `dir` defaulting
/// to the input's own directory.
pub fn mp3_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf, Ogg2Mp3Error> {
    let stem = input
        .file_stem()
        .ok_or_else(|| Ogg2Mp3Error::NotAFile(input.to_path_buf()))?;
    let dir = output_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new(""));
    let mut name = stem.to_owned();
    name.push(".mp3");
    Ok(dir.join(name))
}

/// Converter settings.
#[derive(Debug, Clone)]
pub struct Ogg2Mp3 {
    /// `ogg123` binary.
    pub ogg123: OsString,
    /// `lame` binary.
    pub lame: OsString,
    /// LAME `-V` quality, 0 (best) to 9.
    pub vbr_quality: u8,
    /// Output directory; `None` writes next to each input.
    pub output_dir: Option<PathBuf>,
}

impl Default for Ogg2Mp3 {
    fn default() -> Self {
        Self {
            ogg123: "ogg123".into(),
            lame: "lame".into(),
            vbr_quality: 2,
            output_dir: None,
        }
    }
}

impl Ogg2Mp3 {
    /// Convert every input in order. Returns the mp3 paths written.
    ///
    /// # Errors
    ///
    /// Stops at the first input whose decode or encode fails.
    pub async fn convert_all(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Ogg2Mp3Error> {
        let mut written = Vec::with_capacity(inputs.len());
        for input in inputs {
            written.push(self.convert(input).await?);
        }
        Ok(written)
    }

    /// Convert one file.
    ///
    /// # Errors
    ///
    /// Returns an error if either tool fails or the scratch directory
    /// cannot be created.
    pub async fn convert(&self, input: &Path) -> Result<PathBuf, Ogg2Mp3Error> {
        let mp3 = mp3_path(input, self.output_dir.as_deref())?;
        let scratch = tempfile::tempdir()?;
        let mut wav_name = input.file_stem().unwrap_or(OsStr::new("input")).to_owned();
        wav_name.push(".wav");
        let wav = scratch.path().join(wav_name);

        run_tool(&self.ogg123, &decode_args(input, &wav)).await?;
        run_tool(&self.lame, &encode_args(&wav, &mp3, self.vbr_quality)).await?;

        info!(input = %input.display(), output = %mp3.display(), "converted");
        Ok(mp3)
    }
}
