//! Slash commands and the replies built from conversation outcomes.
//!
//! Reply builders return HTML strings; nothing here talks to Telegram.

use crate::i18n::{translate, translate_with, Language, MessageKey};
use crate::media::cut::format_clock;
use crate::media::{CutRangeError, TagField};
use crate::session::{Preview, Rejection, VideoTarget};
use crate::telegram::ui::{escape_html, format_music_info};

/// Commands the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start`: greet, register and pick a language.
    Start,
    /// `/new`: drop the current file.
    New,
    /// `/language`: show the language chooser.
    Language,
    /// `/help`.
    Help,
    /// `/about`.
    About,
    /// `/done`: save tags and send the music back.
    Done,
    /// `/preview`: show the edited tags.
    Preview,
    /// `/vdone`: convert the video.
    VideoDone,
    /// `/vpreview`: describe the pending video conversion.
    VideoPreview,
    /// `/vadone`: convert the voice message.
    VoiceDone,
    /// `/vapreview`: describe the pending voice conversion.
    VoicePreview,
}

impl Command {
    /// Parse a message starting with `/`.
    ///
    /// A `@botname` suffix and trailing arguments are ignored. Returns
    /// `None` for text that is not a known command.
    pub fn parse(text: &str) -> Option<Self> {
        let without_slash = text.trim().strip_prefix('/')?;
        let full_command = without_slash
            .split_whitespace()
            .next()
            .unwrap_or(without_slash);
        let command = full_command.split('@').next().unwrap_or(full_command);

        match command.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "new" => Some(Self::New),
            "language" => Some(Self::Language),
            "help" => Some(Self::Help),
            "about" => Some(Self::About),
            "done" => Some(Self::Done),
            "preview" => Some(Self::Preview),
            "vdone" => Some(Self::VideoDone),
            "vpreview" => Some(Self::VideoPreview),
            "vadone" => Some(Self::VoiceDone),
            "vapreview" => Some(Self::VoicePreview),
            _ => None,
        }
    }
}

/// Reply to a request the conversation state cannot take.
pub fn rejection_text(rejection: Rejection, lang: Language) -> &'static str {
    match rejection {
        Rejection::NoFile => translate(MessageKey::Default, lang),
        Rejection::WrongMedia | Rejection::NotEditing => translate(MessageKey::AskWhichModule, lang),
        Rejection::NoTagChosen => translate(MessageKey::AskWhichTag, lang),
    }
}

/// `"<first>. OR <second>"`, the way follow-up hints are joined.
fn either(first: MessageKey, second: MessageKey, lang: Language) -> String {
    let or = translate(MessageKey::Or, lang).to_uppercase();
    let second = translate(second, lang);
    let mut chars = second.chars();
    let second = match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} {or} {second}", translate(first, lang))
}

/// Confirmation after a tag received a new value.
pub fn tag_changed_text(field: TagField, lang: Language) -> String {
    format!(
        "{}\n\n{}",
        escape_html(&translate_with(
            MessageKey::TagChanged,
            lang,
            translate(field.button_key(), lang)
        )),
        either(MessageKey::ClickPreview, MessageKey::ClickDone, lang)
    )
}

/// Confirmation after the new album art was stored.
pub fn album_art_changed_text(lang: Language) -> String {
    format!(
        "{} {}",
        translate(MessageKey::AlbumArtChanged, lang),
        either(MessageKey::ClickPreview, MessageKey::ClickDone, lang)
    )
}

/// Prompt after a video conversion was picked.
pub fn video_selected_text(lang: Language) -> String {
    either(MessageKey::ClickVideoPreview, MessageKey::ClickVideoDone, lang)
}

/// Prompt after voice conversion was picked.
pub fn voice_selected_text(lang: Language) -> String {
    either(MessageKey::ClickVoicePreview, MessageKey::ClickVoiceDone, lang)
}

/// Prompt after the music cutter was picked.
pub fn cutter_selected_text(duration_secs: u32, lang: Language) -> String {
    format!(
        "{}\n{}",
        translate_with(MessageKey::MusicLength, lang, &format_clock(duration_secs)),
        translate(MessageKey::AskCutRange, lang)
    )
}

/// Reply to a range the cutter cannot use.
pub fn bad_range_text(error: &CutRangeError, lang: Language) -> String {
    match error {
        CutRangeError::Malformed(_) => translate(MessageKey::ErrMalformedRange, lang).to_owned(),
        CutRangeError::OutOfRange { duration, .. } => {
            translate_with(MessageKey::ErrOutOfRange, lang, &format_clock(*duration))
        }
    }
}

/// Tag listing shown when the tag editor opens.
pub fn tag_editor_text(info: &str, signature: &str, lang: Language) -> String {
    let mut text = format!("{info}\n\n{}", translate(MessageKey::AskWhichTag, lang));
    if !signature.is_empty() {
        text.push_str("\n\n");
        text.push_str(signature);
    }
    text
}

/// Body of `/preview`, `/vpreview` and `/vapreview`.
pub fn preview_text(preview: &Preview, signature: &str, lang: Language) -> String {
    let mut text = match preview {
        Preview::Tags { tags, .. } => format!(
            "{}\n\n{}",
            format_music_info(tags, lang),
            translate(MessageKey::ClickDone, lang)
        ),
        Preview::Video {
            target,
            duration_secs,
        } => {
            let target_label = match target {
                VideoTarget::Note => translate(MessageKey::BtnVideoToNote, lang),
                VideoTarget::Gif => translate(MessageKey::BtnVideoToGif, lang),
            };
            format!(
                "{}\n{}\n\n{}",
                translate_with(MessageKey::VideoPreview, lang, &format_clock(*duration_secs)),
                target_label,
                translate(MessageKey::ClickVideoDone, lang)
            )
        }
        Preview::Voice { duration_secs } => format!(
            "{}\n\n{}",
            translate_with(MessageKey::VoicePreview, lang, &format_clock(*duration_secs)),
            translate(MessageKey::ClickVoiceDone, lang)
        ),
    };
    if !signature.is_empty() {
        text.push_str("\n\n");
        text.push_str(signature);
    }
    text
}
