//! Conversation state machine tests.

use std::path::PathBuf;

use coverbot::i18n::Language;
use coverbot::media::{CutRange, CutRangeError, TagField, TagSet};
use coverbot::session::{
    AudioFile, ClipFile, Finish, Job, Loaded, MediaKind, Module, ModuleChoice, Preview, Rejection,
    Selected, Session, TextOutcome, VideoTarget,
};

fn audio(name: &str) -> AudioFile {
    AudioFile {
        path: PathBuf::from(format!("/tmp/u/{name}.mp3")),
        message_id: 10,
        duration_secs: 200,
        tags: TagSet {
            artist: "Old Artist".to_owned(),
            title: "Old Title".to_owned(),
            ..TagSet::default()
        },
        art_path: Some(PathBuf::from(format!("/tmp/u/{name}.mp3.jpg"))),
        new_art_path: None,
    }
}

fn clip(name: &str, ext: &str) -> ClipFile {
    ClipFile {
        path: PathBuf::from(format!("/tmp/u/{name}.{ext}")),
        message_id: 20,
        duration_secs: 42,
    }
}

fn with_audio() -> Session {
    let mut session = Session::new(Language::En);
    let superseded = session.attach_audio(audio("song"));
    assert!(superseded.is_empty());
    session
}

fn in_tag_editor() -> Session {
    let mut session = with_audio();
    assert_eq!(session.select(ModuleChoice::TagEditor), Ok(Selected::TagEditor));
    session
}

// ---------------------------------------------------------------------------
// Attaching and resetting
// ---------------------------------------------------------------------------

#[test]
fn new_session_is_empty() {
    let session = Session::new(Language::Fa);
    assert_eq!(session.language(), Language::Fa);
    assert_eq!(session.file(), &Loaded::Nothing);
    assert_eq!(session.module(), &Module::Selecting);
    assert_eq!(session.media_kind(), None);
}

#[test]
fn attach_replaces_previous_file_and_returns_its_paths() {
    let mut session = with_audio();

    let superseded = session.attach_video(clip("movie", "mp4"));
    assert_eq!(
        superseded,
        vec![
            PathBuf::from("/tmp/u/song.mp3"),
            PathBuf::from("/tmp/u/song.mp3.jpg"),
        ]
    );
    assert_eq!(session.media_kind(), Some(MediaKind::Video));
    assert_eq!(session.module(), &Module::Selecting);
}

#[test]
fn attach_resets_module() {
    let mut session = in_tag_editor();
    session.attach_voice(clip("voice", "ogg"));
    assert_eq!(session.module(), &Module::Selecting);
    assert_eq!(session.media_kind(), Some(MediaKind::Voice));
}

#[test]
fn reset_returns_every_owned_path_and_keeps_language() {
    let mut session = in_tag_editor();
    session.set_language(Language::Fa);
    session
        .choose_tag(TagField::AlbumArt)
        .expect("album art should be selectable");
    let previous = session
        .accept_art(PathBuf::from("/tmp/u/cover.jpg"))
        .expect("photo should be accepted");
    assert_eq!(previous, None);

    let paths = session.reset();
    assert_eq!(paths.len(), 3);
    assert!(paths.contains(&PathBuf::from("/tmp/u/cover.jpg")));
    assert_eq!(session.file(), &Loaded::Nothing);
    assert_eq!(session.module(), &Module::Selecting);
    assert_eq!(session.language(), Language::Fa);
}

#[test]
fn reset_on_empty_session_returns_nothing() {
    let mut session = Session::new(Language::En);
    assert!(session.reset().is_empty());
}

// ---------------------------------------------------------------------------
// Module selection
// ---------------------------------------------------------------------------

#[test]
fn select_without_file_is_rejected() {
    let mut session = Session::new(Language::En);
    assert_eq!(
        session.select(ModuleChoice::TagEditor),
        Err(Rejection::NoFile)
    );
}

#[test]
fn select_for_other_media_is_rejected() {
    let mut session = with_audio();
    assert_eq!(
        session.select(ModuleChoice::VideoToGif),
        Err(Rejection::WrongMedia)
    );
    assert_eq!(session.module(), &Module::Selecting);
}

#[test]
fn select_music_cutter_reports_duration() {
    let mut session = with_audio();
    assert_eq!(
        session.select(ModuleChoice::MusicCutter),
        Ok(Selected::MusicCutter { duration_secs: 200 })
    );
    assert_eq!(session.module(), &Module::MusicCutter);
}

#[test]
fn select_music_to_voice_starts_job_immediately() {
    let mut session = with_audio();
    let selected = session.select(ModuleChoice::MusicToVoice);
    assert_eq!(
        selected,
        Ok(Selected::Job(Job::AudioToVoice {
            path: PathBuf::from("/tmp/u/song.mp3"),
            reply_to: 10,
        }))
    );
    assert_eq!(session.module(), &Module::Selecting);
}

#[test]
fn select_video_targets() {
    let mut session = Session::new(Language::En);
    session.attach_video(clip("movie", "mp4"));

    assert_eq!(
        session.select(ModuleChoice::VideoToNote),
        Ok(Selected::VideoConverter(VideoTarget::Note))
    );
    assert_eq!(
        session.select(ModuleChoice::VideoToGif),
        Ok(Selected::VideoConverter(VideoTarget::Gif))
    );
    assert_eq!(
        session.module(),
        &Module::VideoConverter {
            target: VideoTarget::Gif
        }
    );
}

#[test]
fn back_returns_to_selector() {
    let mut session = in_tag_editor();
    assert_eq!(session.back(), Ok(MediaKind::Audio));
    assert_eq!(session.module(), &Module::Selecting);
}

#[test]
fn back_without_file_is_rejected() {
    let mut session = Session::new(Language::En);
    assert_eq!(session.back(), Err(Rejection::NoFile));
}

// ---------------------------------------------------------------------------
// Tag editor
// ---------------------------------------------------------------------------

#[test]
fn choose_tag_outside_editor_is_rejected() {
    let mut session = with_audio();
    assert_eq!(
        session.choose_tag(TagField::Title),
        Err(Rejection::NotEditing)
    );
}

#[test]
fn text_before_choosing_tag_is_rejected() {
    let mut session = in_tag_editor();
    assert_eq!(
        session.submit_text("anything"),
        Err(Rejection::NoTagChosen)
    );
}

#[test]
fn text_sets_chosen_tag_and_keeps_it_selected() {
    let mut session = in_tag_editor();
    session
        .choose_tag(TagField::Artist)
        .expect("artist should be selectable");

    assert_eq!(
        session.submit_text("  New Artist "),
        Ok(TextOutcome::TagUpdated(TagField::Artist))
    );
    assert_eq!(
        session.submit_text("Newer Artist"),
        Ok(TextOutcome::TagUpdated(TagField::Artist))
    );

    let Loaded::Audio(audio) = session.file() else {
        panic!("audio should still be loaded");
    };
    assert_eq!(audio.tags.artist, "Newer Artist");
    assert_eq!(audio.tags.title, "Old Title");
}

#[test]
fn numeric_tag_rejects_text() {
    let mut session = in_tag_editor();
    session
        .choose_tag(TagField::Year)
        .expect("year should be selectable");

    assert_eq!(
        session.submit_text("last year"),
        Ok(TextOutcome::ExpectedNumber(TagField::Year))
    );
    assert_eq!(
        session.submit_text("2021"),
        Ok(TextOutcome::TagUpdated(TagField::Year))
    );
}

#[test]
fn album_art_waits_for_photo() {
    let mut session = in_tag_editor();
    assert_eq!(session.expects_art(), Err(Rejection::NoTagChosen));

    session
        .choose_tag(TagField::AlbumArt)
        .expect("album art should be selectable");
    assert_eq!(session.submit_text("a cover"), Ok(TextOutcome::AwaitingPhoto));
    assert_eq!(session.expects_art(), Ok(()));
}

#[test]
fn second_photo_returns_first_for_deletion() {
    let mut session = in_tag_editor();
    session
        .choose_tag(TagField::AlbumArt)
        .expect("album art should be selectable");

    assert_eq!(session.accept_art(PathBuf::from("/tmp/a.jpg")), Ok(None));
    assert_eq!(
        session.accept_art(PathBuf::from("/tmp/b.jpg")),
        Ok(Some(PathBuf::from("/tmp/a.jpg")))
    );
}

#[test]
fn photo_without_audio_is_rejected() {
    let mut session = Session::new(Language::En);
    assert_eq!(
        session.accept_art(PathBuf::from("/tmp/a.jpg")),
        Err(Rejection::NoFile)
    );
}

#[test]
fn text_without_file_is_rejected() {
    let mut session = Session::new(Language::En);
    assert_eq!(session.submit_text("hello"), Err(Rejection::NoFile));
}

#[test]
fn text_with_video_is_not_editing() {
    let mut session = Session::new(Language::En);
    session.attach_video(clip("movie", "mp4"));
    assert_eq!(session.submit_text("hello"), Err(Rejection::NotEditing));
}

// ---------------------------------------------------------------------------
// Music cutter
// ---------------------------------------------------------------------------

#[test]
fn cutter_accepts_range_within_track() {
    let mut session = with_audio();
    session
        .select(ModuleChoice::MusicCutter)
        .expect("cutter should be selectable");

    assert_eq!(
        session.submit_text("0:30-1:45"),
        Ok(TextOutcome::Cut(Job::CutAudio {
            path: PathBuf::from("/tmp/u/song.mp3"),
            range: CutRange { start: 30, end: 105 },
            reply_to: 10,
        }))
    );
}

#[test]
fn cutter_reports_bad_range() {
    let mut session = with_audio();
    session
        .select(ModuleChoice::MusicCutter)
        .expect("cutter should be selectable");

    assert_eq!(
        session.submit_text("3:00-4:00"),
        Ok(TextOutcome::BadRange(CutRangeError::OutOfRange {
            start: 180,
            end: 240,
            duration: 200,
        }))
    );
    assert!(matches!(
        session.submit_text("from here to there"),
        Ok(TextOutcome::BadRange(CutRangeError::Malformed(_)))
    ));
}

// ---------------------------------------------------------------------------
// Finishing and previews
// ---------------------------------------------------------------------------

#[test]
fn finish_tags_prefers_new_artwork_for_thumbnail() {
    let mut session = in_tag_editor();
    session
        .choose_tag(TagField::AlbumArt)
        .expect("album art should be selectable");
    session
        .accept_art(PathBuf::from("/tmp/u/new.jpg"))
        .expect("photo should be accepted");

    let job = session.finish(Finish::Tags).expect("tags should finish");
    let Job::SaveTags {
        new_artwork,
        thumbnail,
        reply_to,
        ..
    } = job
    else {
        panic!("expected SaveTags");
    };
    assert_eq!(new_artwork, Some(PathBuf::from("/tmp/u/new.jpg")));
    assert_eq!(thumbnail, Some(PathBuf::from("/tmp/u/new.jpg")));
    assert_eq!(reply_to, 10);
}

#[test]
fn finish_tags_falls_back_to_original_cover() {
    let session = in_tag_editor();
    let job = session.finish(Finish::Tags).expect("tags should finish");
    let Job::SaveTags {
        new_artwork,
        thumbnail,
        ..
    } = job
    else {
        panic!("expected SaveTags");
    };
    assert_eq!(new_artwork, None);
    assert_eq!(thumbnail, Some(PathBuf::from("/tmp/u/song.mp3.jpg")));
}

#[test]
fn finish_leaves_session_untouched() {
    let session = in_tag_editor();
    let before = session.clone();
    session.finish(Finish::Tags).expect("tags should finish");
    assert_eq!(session, before);
}

#[test]
fn finish_outside_module_is_rejected() {
    let session = with_audio();
    assert_eq!(session.finish(Finish::Tags), Err(Rejection::NotEditing));
    assert_eq!(session.finish(Finish::Video), Err(Rejection::WrongMedia));
}

#[test]
fn finish_video_and_voice() {
    let mut session = Session::new(Language::En);
    session.attach_video(clip("movie", "mp4"));
    session
        .select(ModuleChoice::VideoToNote)
        .expect("note should be selectable");
    assert_eq!(
        session.finish(Finish::Video),
        Ok(Job::ConvertVideo {
            path: PathBuf::from("/tmp/u/movie.mp4"),
            target: VideoTarget::Note,
            reply_to: 20,
        })
    );

    session.attach_voice(clip("voice", "ogg"));
    session
        .select(ModuleChoice::VoiceToAudio)
        .expect("voice converter should be selectable");
    assert_eq!(
        session.finish(Finish::Voice),
        Ok(Job::VoiceToAudio {
            path: PathBuf::from("/tmp/u/voice.ogg"),
            duration_secs: 42,
            reply_to: 20,
        })
    );
}

#[test]
fn previews_describe_pending_work() {
    let mut session = in_tag_editor();
    session
        .choose_tag(TagField::Title)
        .expect("title should be selectable");
    session.submit_text("Fresh").expect("title should be set");
    let Ok(Preview::Tags { tags, art_path }) = session.preview(Finish::Tags) else {
        panic!("expected tag preview");
    };
    assert_eq!(tags.title, "Fresh");
    assert_eq!(art_path, Some(PathBuf::from("/tmp/u/song.mp3.jpg")));

    session.attach_video(clip("movie", "mp4"));
    session
        .select(ModuleChoice::VideoToGif)
        .expect("gif should be selectable");
    assert_eq!(
        session.preview(Finish::Video),
        Ok(Preview::Video {
            target: VideoTarget::Gif,
            duration_secs: 42,
        })
    );

    session.attach_voice(clip("voice", "ogg"));
    assert_eq!(session.preview(Finish::Voice), Err(Rejection::NotEditing));
}

// ---------------------------------------------------------------------------
// Persistence format
// ---------------------------------------------------------------------------

#[test]
fn session_survives_json_encoding() {
    let mut session = in_tag_editor();
    session.set_language(Language::Fa);
    session
        .choose_tag(TagField::Genre)
        .expect("genre should be selectable");

    let json = serde_json::to_string(&session).expect("session should encode");
    let decoded: Session = serde_json::from_str(&json).expect("session should decode");
    assert_eq!(decoded, session);
}

#[test]
fn session_decodes_with_missing_fields() {
    let decoded: Session =
        serde_json::from_str(r#"{"language":"fa"}"#).expect("partial session should decode");
    assert_eq!(decoded, Session::new(Language::Fa));
}
