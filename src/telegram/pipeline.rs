//! Carrying out finished jobs: write, convert, upload, clean up.

use std::path::{Path, PathBuf};

use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, MessageId, ParseMode, ReplyParameters};
use tracing::{info, warn};

use super::media::remove_files;
use super::ui::start_over_keyboard;
use super::SharedState;
use crate::i18n::{translate, Language, MessageKey};
use crate::media::tags::write_tags;
use crate::media::ToolError;
use crate::session::{Job, Session, VideoTarget};

/// Send a translated error with the "New File" keyboard.
///
/// A failed send is only logged; the job still has to be closed.
async fn report(bot: &Bot, chat_id: ChatId, key: MessageKey, lang: Language) {
    let sent = bot
        .send_message(chat_id, translate(key, lang))
        .parse_mode(ParseMode::Html)
        .reply_markup(start_over_keyboard(lang))
        .await;
    if let Err(e) = sent {
        warn!(?key, error = %e, "failed to report job error");
    }
}

/// Reset the user's session and delete the files it owned.
pub(super) async fn close_session(state: &SharedState, user_id: i64) {
    match state.sessions.update(user_id, Session::reset).await {
        Ok(paths) => remove_files(&paths).await,
        Err(e) => warn!(user_id, error = %e, "failed to reset session"),
    }
}

async fn chat_action(bot: &Bot, chat_id: ChatId, action: ChatAction) {
    if let Err(e) = bot.send_chat_action(chat_id, action).await {
        warn!(error = %e, "failed to send chat action");
    }
}

/// Carry out `job` for the user and reset the conversation afterwards.
///
/// Tag saving is the exception: when the tags cannot be written the
/// session is kept so the user can retry.
pub(super) async fn run_job(
    bot: &Bot,
    state: &SharedState,
    chat_id: ChatId,
    user_id: i64,
    lang: Language,
    job: Job,
) {
    match job {
        Job::SaveTags {
            path,
            tags,
            new_artwork,
            thumbnail,
            reply_to,
            ..
        } => {
            chat_action(bot, chat_id, ChatAction::UploadVoice).await;

            let target = path.clone();
            let written = tokio::task::spawn_blocking(move || {
                write_tags(&target, &tags, new_artwork.as_deref())
            })
            .await;
            let saved = match written {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            if let Err(e) = saved {
                warn!(user_id, path = %path.display(), error = %e, "failed to update tags");
                report(bot, chat_id, MessageKey::ErrOnUpdatingTags, lang).await;
                return;
            }
            info!(user_id, path = %path.display(), "tags saved");

            let mut request = bot
                .send_audio(chat_id, InputFile::file(&path))
                .caption(state.signature.clone())
                .parse_mode(ParseMode::Html)
                .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
                .reply_markup(start_over_keyboard(lang));
            if let Some(thumb) = thumbnail {
                request = request.thumbnail(InputFile::file(thumb));
            }
            if let Err(e) = request.await {
                warn!(user_id, error = %e, "failed to upload audio");
                report(bot, chat_id, MessageKey::ErrOnUploading, lang).await;
            }
        }
        Job::CutAudio {
            path,
            range,
            reply_to,
        } => {
            chat_action(bot, chat_id, ChatAction::UploadVoice).await;
            let converted = state.transcoder.cut_audio(&path, range).await;
            upload_converted(bot, chat_id, user_id, lang, converted, |output| {
                bot.send_audio(chat_id, InputFile::file(output))
                    .caption(state.signature.clone())
                    .parse_mode(ParseMode::Html)
                    .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
                    .reply_markup(start_over_keyboard(lang))
            })
            .await;
        }
        Job::AudioToVoice { path, reply_to } => {
            chat_action(bot, chat_id, ChatAction::UploadVoice).await;
            let converted = state.transcoder.audio_to_voice(&path).await;
            upload_converted(bot, chat_id, user_id, lang, converted, |output| {
                bot.send_voice(chat_id, InputFile::file(output))
                    .caption(state.signature.clone())
                    .parse_mode(ParseMode::Html)
                    .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
                    .reply_markup(start_over_keyboard(lang))
            })
            .await;
        }
        Job::ConvertVideo {
            path,
            target: VideoTarget::Note,
            reply_to,
        } => {
            chat_action(bot, chat_id, ChatAction::UploadVideoNote).await;
            let converted = state.transcoder.video_to_note(&path).await;
            upload_converted(bot, chat_id, user_id, lang, converted, |output| {
                bot.send_video_note(chat_id, InputFile::file(output))
                    .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
                    .reply_markup(start_over_keyboard(lang))
            })
            .await;
        }
        Job::ConvertVideo {
            path,
            target: VideoTarget::Gif,
            reply_to,
        } => {
            chat_action(bot, chat_id, ChatAction::UploadVideo).await;
            let converted = state.transcoder.video_to_gif(&path).await;
            upload_converted(bot, chat_id, user_id, lang, converted, |output| {
                bot.send_animation(chat_id, InputFile::file(output))
                    .caption(state.signature.clone())
                    .parse_mode(ParseMode::Html)
                    .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
                    .reply_markup(start_over_keyboard(lang))
            })
            .await;
        }
        Job::VoiceToAudio {
            path,
            reply_to,
            ..
        } => {
            chat_action(bot, chat_id, ChatAction::UploadVoice).await;
            let converted = state.transcoder.voice_to_audio(&path).await;
            upload_converted(bot, chat_id, user_id, lang, converted, |output| {
                bot.send_audio(chat_id, InputFile::file(output))
                    .caption(state.signature.clone())
                    .parse_mode(ParseMode::Html)
                    .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
                    .reply_markup(start_over_keyboard(lang))
            })
            .await;
        }
    }

    close_session(state, user_id).await;
}

/// Upload a conversion result with `send`, reporting failures, then
/// delete the output.
async fn upload_converted<R>(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    lang: Language,
    converted: Result<PathBuf, ToolError>,
    send: impl FnOnce(&Path) -> R,
) where
    R: std::future::IntoFuture<Output = ResponseResult<Message>>,
{
    let output = match converted {
        Ok(output) => output,
        Err(e) => {
            warn!(user_id, error = %e, "conversion failed");
            report(bot, chat_id, MessageKey::ErrOnConverting, lang).await;
            return;
        }
    };

    let sent = send(&output).into_future().await;
    remove_files(std::slice::from_ref(&output)).await;

    if let Err(e) = sent {
        warn!(user_id, error = %e, "failed to upload converted file");
        report(bot, chat_id, MessageKey::ErrOnUploading, lang).await;
    }
}
