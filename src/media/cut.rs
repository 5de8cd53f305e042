//! Parsing of `start-end` ranges for the music cutter.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One side of the range: `ss`, `mm:ss` or `hh:mm:ss`.
static RANGE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*((?:\d{1,2}:){0,2}\d{1,5})\s*-\s*((?:\d{1,2}:){0,2}\d{1,5})\s*$").ok()
});

/// Errors from parsing a cut range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CutRangeError {
    /// The text is not of the form `start-end`.
    #[error("malformed cut range: {0:?}")]
    Malformed(String),

    /// The range is empty or extends past the end of the track.
    #[error("range {start}s-{end}s is outside 0s-{duration}s")]
    OutOfRange {
        /// Requested start in seconds.
        start: u32,
        /// Requested end in seconds.
        end: u32,
        /// Length of the track in seconds.
        duration: u32,
    },
}

/// A validated cut range in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRange {
    /// Inclusive start.
    pub start: u32,
    /// Exclusive end, strictly greater than `start`.
    pub end: u32,
}

impl CutRange {
    /// Parse `text` and check it against a track of `duration` seconds.
    ///
    /// # Errors
    ///
    /// [`CutRangeError::Malformed`] when the text cannot be parsed,
    /// [`CutRangeError::OutOfRange`] when `start >= end` or `end > duration`.
    pub fn parse(text: &str, duration: u32) -> Result<Self, CutRangeError> {
        let malformed = || CutRangeError::Malformed(text.trim().to_owned());
        let caps = RANGE_PATTERN
            .as_ref()
            .and_then(|re| re.captures(text))
            .ok_or_else(malformed)?;
        let start = caps
            .get(1)
            .and_then(|m| parse_timestamp(m.as_str()))
            .ok_or_else(malformed)?;
        let end = caps
            .get(2)
            .and_then(|m| parse_timestamp(m.as_str()))
            .ok_or_else(malformed)?;

        if start >= end || end > duration {
            return Err(CutRangeError::OutOfRange {
                start,
                end,
                duration,
            });
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for CutRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

/// Parse `ss`, `mm:ss` or `hh:mm:ss` into seconds.
///
/// Minutes and seconds after the first component must be below 60.
pub fn parse_timestamp(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut total: u32 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u32 = part.parse().ok()?;
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

/// Render seconds as `m:ss`, or `h:mm:ss` past one hour.
pub fn format_clock(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
