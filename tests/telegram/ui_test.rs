//! Keyboard, button and formatting tests.

use coverbot::i18n::{translate, Language, MessageKey};
use coverbot::media::{TagField, TagSet};
use coverbot::session::{MediaKind, ModuleChoice};
use coverbot::telegram::ui::{
    back_keyboard, escape_html, format_music_info, language_keyboard, module_keyboard, signature,
    start_over_keyboard, tag_editor_keyboard, Button,
};
use teloxide::types::KeyboardMarkup;

fn labels(markup: &KeyboardMarkup) -> Vec<String> {
    markup
        .keyboard
        .iter()
        .flatten()
        .map(|b| b.text.clone())
        .collect()
}

#[test]
fn escape_html_escapes_special_chars() {
    assert_eq!(escape_html("<b>test</b>"), "&lt;b&gt;test&lt;/b&gt;");
    assert_eq!(escape_html("a & b"), "a &amp; b");
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn every_keyboard_label_parses_back() {
    for lang in Language::ALL {
        let keyboards = [
            start_over_keyboard(lang),
            module_keyboard(MediaKind::Audio, lang),
            module_keyboard(MediaKind::Video, lang),
            module_keyboard(MediaKind::Voice, lang),
            tag_editor_keyboard(lang),
            back_keyboard(lang),
            language_keyboard(),
        ];
        for keyboard in &keyboards {
            for label in labels(keyboard) {
                assert!(
                    Button::parse(&label).is_some(),
                    "label {label:?} should parse"
                );
            }
        }
    }
}

#[test]
fn buttons_parse_in_both_languages() {
    assert_eq!(
        Button::parse(translate(MessageKey::BtnTagEditor, Language::Fa)),
        Some(Button::Module(ModuleChoice::TagEditor))
    );
    assert_eq!(
        Button::parse(translate(MessageKey::BtnAlbumArt, Language::En)),
        Some(Button::Tag(TagField::AlbumArt))
    );
    assert_eq!(
        Button::parse(Language::Fa.button_label()),
        Some(Button::Language(Language::Fa))
    );
    assert_eq!(Button::parse("Tag Editor"), None);
}

#[test]
fn module_keyboards_match_media() {
    let audio = labels(&module_keyboard(MediaKind::Audio, Language::En));
    assert!(audio.contains(&translate(MessageKey::BtnMusicCutter, Language::En).to_owned()));
    assert!(!audio.contains(&translate(MessageKey::BtnVideoToGif, Language::En).to_owned()));

    let voice = labels(&module_keyboard(MediaKind::Voice, Language::En));
    assert_eq!(
        voice,
        vec![
            translate(MessageKey::BtnVoiceToAudio, Language::En).to_owned(),
            translate(MessageKey::BtnNewFile, Language::En).to_owned(),
        ]
    );
}

#[test]
fn tag_editor_keyboard_lists_every_field() {
    let labels = labels(&tag_editor_keyboard(Language::En));
    for field in TagField::TEXT_FIELDS {
        assert!(labels.contains(&translate(field.button_key(), Language::En).to_owned()));
    }
    assert!(labels.contains(&translate(MessageKey::BtnAlbumArt, Language::En).to_owned()));
    assert!(labels.contains(&translate(MessageKey::BtnBack, Language::En).to_owned()));
}

#[test]
fn music_info_escapes_values_and_marks_empty() {
    let tags = TagSet {
        artist: "Tom & Jerry".to_owned(),
        ..TagSet::default()
    };
    let info = format_music_info(&tags, Language::En);
    assert!(info.contains("<b>\u{1F3A4} Artist:</b> Tom &amp; Jerry"));
    assert!(info.contains("<b>\u{1F3B6} Title:</b> -"));
    assert_eq!(info.lines().count(), TagField::TEXT_FIELDS.len());
}

#[test]
fn signature_formats_username() {
    assert_eq!(signature("CoverBot"), "\u{1F194} @CoverBot");
    assert_eq!(signature("@CoverBot"), "\u{1F194} @CoverBot");
    assert_eq!(signature("  "), "");
}
