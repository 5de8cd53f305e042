//! Command parsing and reply text tests.

use coverbot::i18n::{translate, Language, MessageKey};
use coverbot::media::{CutRangeError, TagField, TagSet};
use coverbot::session::{Preview, Rejection, VideoTarget};
use coverbot::telegram::commands::{
    album_art_changed_text, bad_range_text, cutter_selected_text, preview_text, rejection_text,
    tag_changed_text, tag_editor_text, video_selected_text, voice_selected_text, Command,
};

#[test]
fn parses_known_commands() {
    assert_eq!(Command::parse("/start"), Some(Command::Start));
    assert_eq!(Command::parse("/new"), Some(Command::New));
    assert_eq!(Command::parse("/language"), Some(Command::Language));
    assert_eq!(Command::parse("/help"), Some(Command::Help));
    assert_eq!(Command::parse("/about"), Some(Command::About));
    assert_eq!(Command::parse("/done"), Some(Command::Done));
    assert_eq!(Command::parse("/preview"), Some(Command::Preview));
    assert_eq!(Command::parse("/vdone"), Some(Command::VideoDone));
    assert_eq!(Command::parse("/vpreview"), Some(Command::VideoPreview));
    assert_eq!(Command::parse("/vadone"), Some(Command::VoiceDone));
    assert_eq!(Command::parse("/vapreview"), Some(Command::VoicePreview));
}

#[test]
fn ignores_bot_suffix_arguments_and_case() {
    assert_eq!(Command::parse("/done@CoverBot"), Some(Command::Done));
    assert_eq!(Command::parse("/START now"), Some(Command::Start));
    assert_eq!(Command::parse("  /help  "), Some(Command::Help));
}

#[test]
fn rejects_unknown_or_non_commands() {
    assert_eq!(Command::parse("/unknown"), None);
    assert_eq!(Command::parse("done"), None);
    assert_eq!(Command::parse(""), None);
}

#[test]
fn rejection_texts() {
    let lang = Language::En;
    assert_eq!(
        rejection_text(Rejection::NoFile, lang),
        translate(MessageKey::Default, lang)
    );
    assert_eq!(
        rejection_text(Rejection::WrongMedia, lang),
        translate(MessageKey::AskWhichModule, lang)
    );
    assert_eq!(
        rejection_text(Rejection::NotEditing, lang),
        translate(MessageKey::AskWhichModule, lang)
    );
    assert_eq!(
        rejection_text(Rejection::NoTagChosen, lang),
        translate(MessageKey::AskWhichTag, lang)
    );
}

#[test]
fn tag_changed_names_field_and_next_steps() {
    let text = tag_changed_text(TagField::Title, Language::En);
    assert!(text.starts_with("\u{1F3B6} Title changed."));
    assert!(text.contains("/preview"));
    assert!(text.contains(" OR click /done"));
}

#[test]
fn album_art_changed_mentions_next_steps() {
    let text = album_art_changed_text(Language::En);
    assert!(text.starts_with(translate(MessageKey::AlbumArtChanged, Language::En)));
    assert!(text.contains("/done"));
}

#[test]
fn converter_prompts_point_at_their_commands() {
    let video = video_selected_text(Language::En);
    assert!(video.contains("/vpreview") && video.contains("/vdone"));
    let voice = voice_selected_text(Language::Fa);
    assert!(voice.contains("/vapreview") && voice.contains("/vadone"));
}

#[test]
fn cutter_prompt_shows_length() {
    let text = cutter_selected_text(185, Language::En);
    assert!(text.contains("3:05"));
    assert!(text.contains(translate(MessageKey::AskCutRange, Language::En)));
}

#[test]
fn bad_range_texts() {
    let malformed = bad_range_text(&CutRangeError::Malformed("x".to_owned()), Language::En);
    assert_eq!(malformed, translate(MessageKey::ErrMalformedRange, Language::En));

    let out = bad_range_text(
        &CutRangeError::OutOfRange {
            start: 0,
            end: 500,
            duration: 125,
        },
        Language::En,
    );
    assert!(out.contains("2:05"));
}

#[test]
fn tag_editor_text_appends_signature() {
    let text = tag_editor_text("<b>Artist:</b> x", "\u{1F194} @CoverBot", Language::En);
    assert!(text.starts_with("<b>Artist:</b> x"));
    assert!(text.contains(translate(MessageKey::AskWhichTag, Language::En)));
    assert!(text.ends_with("@CoverBot"));

    let bare = tag_editor_text("info", "", Language::En);
    assert!(!bare.ends_with('\n'));
}

#[test]
fn previews_render_each_kind() {
    let tags = TagSet {
        title: "Song".to_owned(),
        ..TagSet::default()
    };
    let text = preview_text(
        &Preview::Tags {
            tags,
            art_path: None,
        },
        "",
        Language::En,
    );
    assert!(text.contains("Song"));
    assert!(text.contains("/done"));

    let text = preview_text(
        &Preview::Video {
            target: VideoTarget::Gif,
            duration_secs: 9,
        },
        "sig",
        Language::En,
    );
    assert!(text.contains("0:09"));
    assert!(text.contains(translate(MessageKey::BtnVideoToGif, Language::En)));
    assert!(text.ends_with("sig"));

    let text = preview_text(&Preview::Voice { duration_secs: 61 }, "", Language::Fa);
    assert!(text.contains("1:01"));
    assert!(text.contains("/vadone"));
}
