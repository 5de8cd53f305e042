//! Media handling: tag I/O, cut ranges and `ffmpeg` conversions.

pub mod cut;
pub mod process;
pub mod tags;
pub mod transcode;

pub use cut::{CutRange, CutRangeError};
pub use process::ToolError;
pub use tags::{AudioMetadata, TagError, TagField, TagSet};
pub use transcode::Transcoder;
