//! Reply keyboards, button parsing and HTML formatting.
//!
//! All output uses HTML parse mode.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::i18n::{translate, Language, MessageKey};
use crate::media::{TagField, TagSet};
use crate::session::{MediaKind, ModuleChoice};

/// Escape special HTML characters in user-provided text.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A reply keyboard button the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Language chooser.
    Language(Language),
    /// Drop the current file.
    NewFile,
    /// Module selector.
    Module(ModuleChoice),
    /// Tag editor field.
    Tag(TagField),
    /// Back to the module selector.
    Back,
}

impl Button {
    const KEYED: [(MessageKey, Button); 16] = [
        (MessageKey::BtnNewFile, Button::NewFile),
        (MessageKey::BtnBack, Button::Back),
        (MessageKey::BtnTagEditor, Button::Module(ModuleChoice::TagEditor)),
        (MessageKey::BtnMusicCutter, Button::Module(ModuleChoice::MusicCutter)),
        (MessageKey::BtnMusicToVoice, Button::Module(ModuleChoice::MusicToVoice)),
        (MessageKey::BtnVideoToNote, Button::Module(ModuleChoice::VideoToNote)),
        (MessageKey::BtnVideoToGif, Button::Module(ModuleChoice::VideoToGif)),
        (MessageKey::BtnVoiceToAudio, Button::Module(ModuleChoice::VoiceToAudio)),
        (MessageKey::BtnArtist, Button::Tag(TagField::Artist)),
        (MessageKey::BtnTitle, Button::Tag(TagField::Title)),
        (MessageKey::BtnAlbum, Button::Tag(TagField::Album)),
        (MessageKey::BtnGenre, Button::Tag(TagField::Genre)),
        (MessageKey::BtnYear, Button::Tag(TagField::Year)),
        (MessageKey::BtnDiskNumber, Button::Tag(TagField::DiskNumber)),
        (MessageKey::BtnTrackNumber, Button::Tag(TagField::TrackNumber)),
        (MessageKey::BtnAlbumArt, Button::Tag(TagField::AlbumArt)),
    ];

    /// Map a keyboard label in any supported language back to its button.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(lang) = Language::ALL.iter().find(|l| l.button_label() == text) {
            return Some(Self::Language(*lang));
        }
        Self::KEYED.iter().find_map(|(key, button)| {
            Language::ALL
                .iter()
                .any(|l| translate(*key, *l) == text)
                .then_some(*button)
        })
    }
}

fn button(key: MessageKey, lang: Language) -> KeyboardButton {
    KeyboardButton::new(translate(key, lang))
}

fn reply_keyboard(rows: Vec<Vec<KeyboardButton>>) -> KeyboardMarkup {
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// One button per supported language.
pub fn language_keyboard() -> KeyboardMarkup {
    reply_keyboard(vec![Language::ALL
        .iter()
        .map(|l| KeyboardButton::new(l.button_label()))
        .collect()])
    .one_time_keyboard()
}

/// Single "New File" button shown after a file is finished.
pub fn start_over_keyboard(lang: Language) -> KeyboardMarkup {
    reply_keyboard(vec![vec![button(MessageKey::BtnNewFile, lang)]])
}

/// Module selector for the given media kind.
pub fn module_keyboard(kind: MediaKind, lang: Language) -> KeyboardMarkup {
    let modules = match kind {
        MediaKind::Audio => vec![
            vec![button(MessageKey::BtnTagEditor, lang)],
            vec![
                button(MessageKey::BtnMusicCutter, lang),
                button(MessageKey::BtnMusicToVoice, lang),
            ],
        ],
        MediaKind::Video => vec![
            vec![button(MessageKey::BtnVideoToNote, lang)],
            vec![button(MessageKey::BtnVideoToGif, lang)],
        ],
        MediaKind::Voice => vec![vec![button(MessageKey::BtnVoiceToAudio, lang)]],
    };
    let mut rows = modules;
    rows.push(vec![button(MessageKey::BtnNewFile, lang)]);
    reply_keyboard(rows)
}

/// Tag editor: one button per tag plus Back and New File.
pub fn tag_editor_keyboard(lang: Language) -> KeyboardMarkup {
    let tag = |field: TagField| button(field.button_key(), lang);
    reply_keyboard(vec![
        vec![tag(TagField::Artist), tag(TagField::Title), tag(TagField::Album)],
        vec![tag(TagField::Genre), tag(TagField::Year), tag(TagField::AlbumArt)],
        vec![tag(TagField::DiskNumber), tag(TagField::TrackNumber)],
        vec![
            button(MessageKey::BtnBack, lang),
            button(MessageKey::BtnNewFile, lang),
        ],
    ])
}

/// Back button shown inside the music cutter and converters.
pub fn back_keyboard(lang: Language) -> KeyboardMarkup {
    reply_keyboard(vec![vec![
        button(MessageKey::BtnBack, lang),
        button(MessageKey::BtnNewFile, lang),
    ]])
}

/// One line per tag, `-` for empty values.
pub fn format_music_info(tags: &TagSet, lang: Language) -> String {
    TagField::TEXT_FIELDS
        .iter()
        .map(|field| {
            let value = tags.get(*field).trim();
            let value = if value.is_empty() {
                "-".to_owned()
            } else {
                escape_html(value)
            };
            format!(
                "<b>{}:</b> {value}",
                escape_html(translate(field.button_key(), lang))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Caption signature, e.g. `🆔 @CoverBot`; empty when unset.
pub fn signature(bot_username: &str) -> String {
    let name = bot_username.trim();
    if name.is_empty() {
        String::new()
    } else if name.starts_with('@') {
        format!("\u{1F194} {}", escape_html(name))
    } else {
        format!("\u{1F194} @{}", escape_html(name))
    }
}
