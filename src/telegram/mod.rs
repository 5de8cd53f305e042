//! Telegram front end: dispatcher, media intake, commands and buttons.
//!
//! Every update is classified (media, command, keyboard button, URL or
//! plain text), run through the user's [`Session`], and the outcome is
//! turned into replies. Handlers never fail on user input; errors are
//! logged and answered with a translated message.

use std::path::PathBuf;
use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, InputFile, KeyboardRemove, MessageId, ParseMode, PhotoSize, ReplyMarkup,
    ReplyParameters, User,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::i18n::{translate, Language, MessageKey};
use crate::media::tags::read_tags;
use crate::media::Transcoder;
use crate::session::{
    AudioFile, ClipFile, Finish, Loaded, MediaKind, Preview, Rejection, Selected, Session,
    TextOutcome,
};
use crate::store::SessionStore;

pub mod commands;
pub mod media;
mod pipeline;
pub mod ui;

use self::commands::Command;
use self::ui::Button;

// ---------------------------------------------------------------------------
// Shared state for handler injection
// ---------------------------------------------------------------------------

/// Shared dependencies injected into teloxide handlers via `dptree::deps!`.
#[derive(Clone)]
struct SharedState {
    config: Arc<Config>,
    sessions: Arc<SessionStore>,
    transcoder: Arc<Transcoder>,
    downloads_dir: PathBuf,
    signature: String,
}

/// Sender of a message, as stored in the database.
struct Sender {
    user_id: i64,
    username: Option<String>,
}

impl Sender {
    fn from_user(user: &User) -> Self {
        Self {
            // teloxide uses u64 for user IDs; SQLite stores i64.
            user_id: i64::try_from(user.id.0).unwrap_or(0),
            username: user.username.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the bot until Ctrl+C.
///
/// # Errors
///
/// Currently only returns `Ok`; dispatch errors are logged per update.
pub async fn run_telegram(
    bot_token: &str,
    config: Arc<Config>,
    sessions: Arc<SessionStore>,
    downloads_dir: PathBuf,
) -> anyhow::Result<()> {
    let bot = Bot::new(bot_token);

    let state = SharedState {
        signature: ui::signature(&config.telegram.bot_username),
        transcoder: Arc::new(Transcoder::new(config.media.clone())),
        config,
        sessions,
        downloads_dir,
    };

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    info!("telegram dispatcher starting");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reply helpers
// ---------------------------------------------------------------------------

async fn reply(
    bot: &Bot,
    msg: &Message,
    text: impl Into<String>,
    markup: Option<ReplyMarkup>,
) -> ResponseResult<()> {
    let mut request = bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id));
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

async fn reply_key(
    bot: &Bot,
    msg: &Message,
    key: MessageKey,
    lang: Language,
    markup: Option<ReplyMarkup>,
) -> ResponseResult<()> {
    reply(bot, msg, translate(key, lang), markup).await
}

fn remove_keyboard() -> Option<ReplyMarkup> {
    Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new()))
}

fn start_over(lang: Language) -> Option<ReplyMarkup> {
    Some(ui::start_over_keyboard(lang).into())
}

/// Module keyboard for whatever is loaded, if anything.
fn module_markup(session: &Session) -> Option<ReplyMarkup> {
    session
        .media_kind()
        .map(|kind| ui::module_keyboard(kind, session.language()).into())
}

// ---------------------------------------------------------------------------
// Message handler
// ---------------------------------------------------------------------------

/// Handle an incoming Telegram message.
async fn handle_message(bot: Bot, msg: Message, state: SharedState) -> ResponseResult<()> {
    let Some(sender) = msg.from.as_ref().map(Sender::from_user) else {
        return Ok(());
    };

    debug!(user_id = sender.user_id, "telegram message received");

    let session = match state.sessions.get(sender.user_id).await {
        Ok(session) => session,
        Err(e) => {
            warn!(user_id = sender.user_id, error = %e, "failed to load session");
            reply_key(&bot, &msg, MessageKey::ReportBug, Language::default(), None).await?;
            return Ok(());
        }
    };

    if msg.audio().is_some() {
        handle_audio(&bot, &msg, &state, &sender, &session).await
    } else if msg.video().is_some() {
        handle_clip(&bot, &msg, &state, &sender, &session, MediaKind::Video).await
    } else if msg.voice().is_some() {
        handle_clip(&bot, &msg, &state, &sender, &session, MediaKind::Voice).await
    } else if let Some(photos) = msg.photo() {
        handle_photo(&bot, &msg, &state, &sender, &session, photos).await
    } else if let Some(text) = msg.text() {
        handle_text(&bot, &msg, &state, &sender, &session, text).await
    } else {
        debug!(user_id = sender.user_id, "unsupported message type, ignoring");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Media intake
// ---------------------------------------------------------------------------

/// Record the file in the usage counter and refresh the username.
async fn count_file(state: &SharedState, sender: &Sender, lang: Language) {
    let store = state.sessions.store();
    let username = sender.username.as_deref();
    if let Err(e) = store.register_user(sender.user_id, username, lang).await {
        warn!(user_id = sender.user_id, error = %e, "failed to register user");
        return;
    }
    match store.increment_files_sent(sender.user_id).await {
        Ok(total) => debug!(user_id = sender.user_id, total, "file counted"),
        Err(e) => warn!(user_id = sender.user_id, error = %e, "failed to count file"),
    }
    if let Err(e) = store.update_username(sender.user_id, username).await {
        warn!(user_id = sender.user_id, error = %e, "failed to update username");
    }
}

/// Create the user's download directory, reporting failure to the user.
async fn prepare_user_dir(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    lang: Language,
) -> ResponseResult<Option<PathBuf>> {
    let dir = media::user_dir(&state.downloads_dir, sender.user_id);
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        warn!(user_id = sender.user_id, dir = %dir.display(), error = %e, "failed to create user directory");
        reply_key(bot, msg, MessageKey::ErrCreatingUserFolder, lang, None).await?;
        return Ok(None);
    }
    Ok(Some(dir))
}

async fn handle_audio(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
) -> ResponseResult<()> {
    let Some(audio) = msg.audio() else {
        return Ok(());
    };
    let lang = session.language();
    let duration_secs = audio.duration.seconds();

    if state
        .config
        .limits
        .rejects(duration_secs, u64::from(audio.file.size))
    {
        return reply_key(bot, msg, MessageKey::ErrTooLargeFile, lang, start_over(lang)).await;
    }

    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        debug!(error = %e, "failed to send chat action");
    }

    let Some(dir) = prepare_user_dir(bot, msg, state, sender, lang).await? else {
        return Ok(());
    };
    let path = media::unique_path(&dir, &media::audio_extension(audio));

    if let Err(e) = media::download_telegram_file(bot, &audio.file.id, &path).await {
        warn!(user_id = sender.user_id, error = %e, "failed to download audio");
        media::remove_files(std::slice::from_ref(&path)).await;
        return reply_key(bot, msg, MessageKey::ErrOnDownloadAudio, lang, None).await;
    }

    let target = path.clone();
    let metadata = match tokio::task::spawn_blocking(move || read_tags(&target)).await {
        Ok(Ok(metadata)) => metadata,
        Ok(Err(e)) => {
            warn!(user_id = sender.user_id, path = %path.display(), error = %e, "failed to read tags");
            media::remove_files(std::slice::from_ref(&path)).await;
            return reply_key(bot, msg, MessageKey::ErrOnReadingTags, lang, None).await;
        }
        Err(e) => {
            warn!(user_id = sender.user_id, error = %e, "tag reader panicked");
            media::remove_files(std::slice::from_ref(&path)).await;
            return reply_key(bot, msg, MessageKey::ErrOnReadingTags, lang, None).await;
        }
    };

    let art_path = match metadata.artwork {
        Some(bytes) => {
            let art = media::artwork_path(&path);
            match tokio::fs::write(&art, bytes).await {
                Ok(()) => Some(art),
                Err(e) => {
                    warn!(user_id = sender.user_id, error = %e, "failed to save artwork");
                    None
                }
            }
        }
        None => None,
    };

    let file = AudioFile {
        path,
        message_id: msg.id.0,
        duration_secs: if duration_secs > 0 {
            duration_secs
        } else {
            metadata.duration_secs
        },
        tags: metadata.tags,
        art_path,
        new_art_path: None,
    };

    let superseded = match state
        .sessions
        .update(sender.user_id, |s| s.attach_audio(file))
        .await
    {
        Ok(paths) => paths,
        Err(e) => {
            warn!(user_id = sender.user_id, error = %e, "failed to save session");
            Vec::new()
        }
    };

    reply_key(
        bot,
        msg,
        MessageKey::AskWhichModule,
        lang,
        Some(ui::module_keyboard(MediaKind::Audio, lang).into()),
    )
    .await?;

    count_file(state, sender, lang).await;
    media::remove_files(&superseded).await;
    Ok(())
}

/// Video and voice intake: same pipeline as audio without tag reading.
async fn handle_clip(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
    kind: MediaKind,
) -> ResponseResult<()> {
    let lang = session.language();
    let (file_meta, duration_secs, ext, download_error) = match kind {
        MediaKind::Video => match msg.video() {
            Some(v) => (&v.file, v.duration.seconds(), "mp4", MessageKey::ErrOnDownloadVideo),
            None => return Ok(()),
        },
        MediaKind::Voice => match msg.voice() {
            Some(v) => (&v.file, v.duration.seconds(), "ogg", MessageKey::ErrOnDownloadVoice),
            None => return Ok(()),
        },
        MediaKind::Audio => return Ok(()),
    };

    if state
        .config
        .limits
        .rejects(duration_secs, u64::from(file_meta.size))
    {
        return reply_key(bot, msg, MessageKey::ErrTooLargeFile, lang, start_over(lang)).await;
    }

    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        debug!(error = %e, "failed to send chat action");
    }

    let Some(dir) = prepare_user_dir(bot, msg, state, sender, lang).await? else {
        return Ok(());
    };
    let path = media::unique_path(&dir, ext);

    if let Err(e) = media::download_telegram_file(bot, &file_meta.id, &path).await {
        warn!(user_id = sender.user_id, error = %e, "failed to download media");
        media::remove_files(std::slice::from_ref(&path)).await;
        return reply_key(bot, msg, download_error, lang, None).await;
    }

    let clip = ClipFile {
        path,
        message_id: msg.id.0,
        duration_secs,
    };
    let superseded = match state
        .sessions
        .update(sender.user_id, |s| match kind {
            MediaKind::Video => s.attach_video(clip),
            _ => s.attach_voice(clip),
        })
        .await
    {
        Ok(paths) => paths,
        Err(e) => {
            warn!(user_id = sender.user_id, error = %e, "failed to save session");
            Vec::new()
        }
    };

    reply_key(
        bot,
        msg,
        MessageKey::AskWhichModule,
        lang,
        Some(ui::module_keyboard(kind, lang).into()),
    )
    .await?;

    count_file(state, sender, lang).await;
    media::remove_files(&superseded).await;
    Ok(())
}

async fn handle_photo(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
    photos: &[PhotoSize],
) -> ResponseResult<()> {
    let lang = session.language();
    if let Err(rejection) = session.expects_art() {
        let markup = match rejection {
            Rejection::NoTagChosen => Some(ui::tag_editor_keyboard(lang).into()),
            _ => module_markup(session),
        };
        return reply(bot, msg, commands::rejection_text(rejection, lang), markup).await;
    }

    let Some(photo) = media::largest_photo(photos) else {
        return reply_key(bot, msg, MessageKey::ErrOnDownloadPhoto, lang, None).await;
    };
    let Some(dir) = prepare_user_dir(bot, msg, state, sender, lang).await? else {
        return Ok(());
    };
    let path = media::unique_path(&dir, "jpg");

    if let Err(e) = media::download_telegram_file(bot, &photo.file.id, &path).await {
        warn!(user_id = sender.user_id, error = %e, "failed to download photo");
        media::remove_files(std::slice::from_ref(&path)).await;
        return reply_key(bot, msg, MessageKey::ErrOnDownloadPhoto, lang, None).await;
    }

    let stored = path.clone();
    match state
        .sessions
        .update(sender.user_id, |s| s.accept_art(stored))
        .await
    {
        Ok(Ok(previous)) => {
            media::remove_files(&previous.into_iter().collect::<Vec<_>>()).await;
            reply(
                bot,
                msg,
                commands::album_art_changed_text(lang),
                Some(ui::tag_editor_keyboard(lang).into()),
            )
            .await
        }
        Ok(Err(rejection)) => {
            media::remove_files(std::slice::from_ref(&path)).await;
            reply(bot, msg, commands::rejection_text(rejection, lang), None).await
        }
        Err(e) => {
            warn!(user_id = sender.user_id, error = %e, "failed to save session");
            media::remove_files(std::slice::from_ref(&path)).await;
            reply_key(bot, msg, MessageKey::ReportBug, lang, None).await
        }
    }
}

// ---------------------------------------------------------------------------
// Text: commands, buttons, URLs and values
// ---------------------------------------------------------------------------

/// An `http(s)` URL sent as the whole message.
pub fn parse_download_url(text: &str) -> Option<url::Url> {
    let text = text.trim();
    if text.contains(char::is_whitespace) {
        return None;
    }
    url::Url::parse(text)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

async fn handle_text(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
    text: &str,
) -> ResponseResult<()> {
    let lang = session.language();

    if text.trim_start().starts_with('/') {
        return match Command::parse(text) {
            Some(command) => handle_command(bot, msg, state, sender, session, command).await,
            None => reply_key(bot, msg, MessageKey::Default, lang, None).await,
        };
    }

    if let Some(button) = Button::parse(text) {
        return handle_button(bot, msg, state, sender, session, button).await;
    }

    if let Some(url) = parse_download_url(text) {
        info!(user_id = sender.user_id, url = %url, "sending url as document");
        if let Err(e) = bot.send_document(msg.chat.id, InputFile::url(url)).await {
            warn!(user_id = sender.user_id, error = %e, "failed to send url as document");
            reply_key(bot, msg, MessageKey::ErrOnUploading, lang, None).await?;
        }
        return Ok(());
    }

    let outcome = match state
        .sessions
        .update(sender.user_id, |s| s.submit_text(text))
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(user_id = sender.user_id, error = %e, "failed to save session");
            return reply_key(bot, msg, MessageKey::ReportBug, lang, None).await;
        }
    };

    match outcome {
        Ok(TextOutcome::TagUpdated(field)) => {
            reply(
                bot,
                msg,
                commands::tag_changed_text(field, lang),
                Some(ui::tag_editor_keyboard(lang).into()),
            )
            .await
        }
        Ok(TextOutcome::ExpectedNumber(_)) => {
            reply_key(bot, msg, MessageKey::ExpectedNumber, lang, None).await
        }
        Ok(TextOutcome::AwaitingPhoto) => {
            reply_key(bot, msg, MessageKey::AskForAlbumArt, lang, None).await
        }
        Ok(TextOutcome::Cut(job)) => {
            pipeline::run_job(bot, state, msg.chat.id, sender.user_id, lang, job).await;
            Ok(())
        }
        Ok(TextOutcome::BadRange(e)) => {
            reply(bot, msg, commands::bad_range_text(&e, lang), None).await
        }
        Err(rejection) => {
            reply(
                bot,
                msg,
                commands::rejection_text(rejection, lang),
                module_markup(session),
            )
            .await
        }
    }
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
    command: Command,
) -> ResponseResult<()> {
    let lang = session.language();
    match command {
        Command::Start => {
            pipeline::close_session(state, sender.user_id).await;
            match state
                .sessions
                .store()
                .register_user(sender.user_id, sender.username.as_deref(), lang)
                .await
            {
                Ok(true) => info!(user_id = sender.user_id, "new user registered"),
                Ok(false) => {}
                Err(e) => warn!(user_id = sender.user_id, error = %e, "failed to register user"),
            }
            reply_key(bot, msg, MessageKey::Start, lang, None).await?;
            reply_key(
                bot,
                msg,
                MessageKey::ChooseLanguage,
                lang,
                Some(ui::language_keyboard().into()),
            )
            .await
        }
        Command::New => {
            pipeline::close_session(state, sender.user_id).await;
            reply_key(bot, msg, MessageKey::StartOver, lang, remove_keyboard()).await
        }
        Command::Language => {
            reply_key(
                bot,
                msg,
                MessageKey::ChooseLanguage,
                lang,
                Some(ui::language_keyboard().into()),
            )
            .await
        }
        Command::Help => reply_key(bot, msg, MessageKey::Help, lang, None).await,
        Command::About => reply_key(bot, msg, MessageKey::About, lang, None).await,
        Command::Done => finish(bot, msg, state, sender, session, Finish::Tags).await,
        Command::VideoDone => finish(bot, msg, state, sender, session, Finish::Video).await,
        Command::VoiceDone => finish(bot, msg, state, sender, session, Finish::Voice).await,
        Command::Preview => preview(bot, msg, state, session, Finish::Tags).await,
        Command::VideoPreview => preview(bot, msg, state, session, Finish::Video).await,
        Command::VoicePreview => preview(bot, msg, state, session, Finish::Voice).await,
    }
}

async fn finish(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
    kind: Finish,
) -> ResponseResult<()> {
    let lang = session.language();
    match session.finish(kind) {
        Ok(job) => {
            pipeline::run_job(bot, state, msg.chat.id, sender.user_id, lang, job).await;
            Ok(())
        }
        Err(rejection) => {
            reply(
                bot,
                msg,
                commands::rejection_text(rejection, lang),
                module_markup(session),
            )
            .await
        }
    }
}

async fn preview(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    session: &Session,
    kind: Finish,
) -> ResponseResult<()> {
    let lang = session.language();
    let preview = match session.preview(kind) {
        Ok(preview) => preview,
        Err(rejection) => {
            return reply(
                bot,
                msg,
                commands::rejection_text(rejection, lang),
                module_markup(session),
            )
            .await;
        }
    };

    let text = commands::preview_text(&preview, &state.signature, lang);
    if let Preview::Tags {
        art_path: Some(art),
        ..
    } = &preview
    {
        bot.send_photo(msg.chat.id, InputFile::file(art))
            .caption(text)
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }
    reply(bot, msg, text, None).await
}

async fn handle_button(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    sender: &Sender,
    session: &Session,
    button: Button,
) -> ResponseResult<()> {
    let lang = session.language();
    match button {
        Button::Language(new_lang) => {
            if let Err(e) = state
                .sessions
                .update(sender.user_id, |s| s.set_language(new_lang))
                .await
            {
                warn!(user_id = sender.user_id, error = %e, "failed to save session");
            }
            if let Err(e) = state
                .sessions
                .store()
                .set_language(sender.user_id, new_lang)
                .await
            {
                warn!(user_id = sender.user_id, error = %e, "failed to store language");
            }
            let markup = match session.media_kind() {
                Some(kind) => Some(ui::module_keyboard(kind, new_lang).into()),
                None => remove_keyboard(),
            };
            reply_key(bot, msg, MessageKey::LanguageChanged, new_lang, markup).await
        }
        Button::NewFile => {
            pipeline::close_session(state, sender.user_id).await;
            reply_key(bot, msg, MessageKey::StartOver, lang, remove_keyboard()).await
        }
        Button::Back => {
            match state.sessions.update(sender.user_id, Session::back).await {
                Ok(Ok(kind)) => {
                    reply_key(
                        bot,
                        msg,
                        MessageKey::AskWhichModule,
                        lang,
                        Some(ui::module_keyboard(kind, lang).into()),
                    )
                    .await
                }
                Ok(Err(rejection)) => {
                    reply(bot, msg, commands::rejection_text(rejection, lang), remove_keyboard()).await
                }
                Err(e) => {
                    warn!(user_id = sender.user_id, error = %e, "failed to save session");
                    reply_key(bot, msg, MessageKey::ReportBug, lang, None).await
                }
            }
        }
        Button::Tag(field) => {
            match state
                .sessions
                .update(sender.user_id, |s| s.choose_tag(field))
                .await
            {
                Ok(Ok(field)) => reply_key(bot, msg, field.prompt_key(), lang, None).await,
                Ok(Err(rejection)) => {
                    reply(
                        bot,
                        msg,
                        commands::rejection_text(rejection, lang),
                        module_markup(session),
                    )
                    .await
                }
                Err(e) => {
                    warn!(user_id = sender.user_id, error = %e, "failed to save session");
                    reply_key(bot, msg, MessageKey::ReportBug, lang, None).await
                }
            }
        }
        Button::Module(choice) => {
            let selected = match state
                .sessions
                .update(sender.user_id, |s| s.select(choice))
                .await
            {
                Ok(selected) => selected,
                Err(e) => {
                    warn!(user_id = sender.user_id, error = %e, "failed to save session");
                    return reply_key(bot, msg, MessageKey::ReportBug, lang, None).await;
                }
            };
            match selected {
                Ok(Selected::TagEditor) => show_tag_editor(bot, msg, state, session, lang).await,
                Ok(Selected::MusicCutter { duration_secs }) => {
                    reply(
                        bot,
                        msg,
                        commands::cutter_selected_text(duration_secs, lang),
                        Some(ui::back_keyboard(lang).into()),
                    )
                    .await
                }
                Ok(Selected::VideoConverter(_)) => {
                    reply(
                        bot,
                        msg,
                        commands::video_selected_text(lang),
                        Some(ui::back_keyboard(lang).into()),
                    )
                    .await
                }
                Ok(Selected::VoiceConverter) => {
                    reply(
                        bot,
                        msg,
                        commands::voice_selected_text(lang),
                        Some(ui::back_keyboard(lang).into()),
                    )
                    .await
                }
                Ok(Selected::Job(job)) => {
                    pipeline::run_job(bot, state, msg.chat.id, sender.user_id, lang, job).await;
                    Ok(())
                }
                Err(rejection) => {
                    reply(
                        bot,
                        msg,
                        commands::rejection_text(rejection, lang),
                        module_markup(session),
                    )
                    .await
                }
            }
        }
    }
}

/// Show current tags (with the cover, when there is one) and the tag keyboard.
async fn show_tag_editor(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    session: &Session,
    lang: Language,
) -> ResponseResult<()> {
    let Loaded::Audio(audio) = session.file() else {
        return Ok(());
    };
    let info = ui::format_music_info(&audio.tags, lang);
    let text = commands::tag_editor_text(&info, &state.signature, lang);
    let keyboard = ui::tag_editor_keyboard(lang);

    let art = audio.new_art_path.as_ref().or(audio.art_path.as_ref());
    if let Some(art) = art {
        bot.send_photo(msg.chat.id, InputFile::file(art))
            .caption(text)
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(MessageId(audio.message_id)))
            .reply_markup(keyboard)
            .await?;
        return Ok(());
    }
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(MessageId(audio.message_id)))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}
