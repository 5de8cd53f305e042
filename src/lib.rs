//! Coverbot: a Telegram bot for music files, videos and voice messages.
//!
//! Users send a file, pick a module from a reply keyboard and get the
//! result back: edited ID3 tags and cover art, a cut section of a song,
//! a voice message, a round video note, a GIF, or an MP3 of a voice
//! message. Conversions shell out to `ffmpeg`.
//!
//! See `DESIGN.md` for the architecture.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod i18n;
pub mod logging;
pub mod media;
pub mod ogg2mp3;
pub mod session;
pub mod store;
pub mod telegram;
