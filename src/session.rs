//! Per-user conversation state.
//!
//! A [`Session`] records the file a user sent last and which module they
//! are working in. Operations are pure: they update the state and return
//! what the Telegram layer should do next ([`Selected`], [`TextOutcome`],
//! [`Job`]) or why the request does not fit the state ([`Rejection`]).
//! Files on disk are never touched here; operations that drop a file hand
//! its paths back so the caller can delete them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::media::{CutRange, CutRangeError, TagField, TagSet};

/// A music file waiting to be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFile {
    /// Downloaded file.
    pub path: PathBuf,
    /// Message that carried the file; results reply to it.
    pub message_id: i32,
    /// Playback length in seconds.
    pub duration_secs: u32,
    /// Tags as read from the file, then as edited.
    pub tags: TagSet,
    /// Cover extracted from the file, if it had one.
    pub art_path: Option<PathBuf>,
    /// Cover sent by the user to replace the current one.
    pub new_art_path: Option<PathBuf>,
}

/// A video or voice message waiting to be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipFile {
    /// Downloaded file.
    pub path: PathBuf,
    /// Message that carried the file.
    pub message_id: i32,
    /// Length in seconds.
    pub duration_secs: u32,
}

/// The file currently attached to the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Loaded {
    /// No file yet, or the last one was finished.
    #[default]
    Nothing,
    /// A music file.
    Audio(AudioFile),
    /// A video.
    Video(ClipFile),
    /// A voice message.
    Voice(ClipFile),
}

/// Kind of the attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Music.
    Audio,
    /// Video.
    Video,
    /// Voice message.
    Voice,
}

/// What a video is turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoTarget {
    /// Round video note.
    Note,
    /// Looping GIF.
    Gif,
}

/// Module the user is working in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum Module {
    /// A file is loaded (or not) and no module has been picked.
    #[default]
    Selecting,
    /// Editing tags of the audio file; `editing` is the tag awaiting a value.
    TagEditor {
        /// Tag chosen from the keyboard.
        editing: Option<TagField>,
    },
    /// Waiting for a `start-end` range to cut the audio file.
    MusicCutter,
    /// Converting the video.
    VideoConverter {
        /// Requested output.
        target: VideoTarget,
    },
    /// Converting the voice message to music.
    VoiceConverter,
}

/// A module button pressed on a selector keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleChoice {
    /// Edit tags of a music file.
    TagEditor,
    /// Cut a section of a music file.
    MusicCutter,
    /// Turn a music file into a voice message.
    MusicToVoice,
    /// Turn a video into a round video note.
    VideoToNote,
    /// Turn a video into a GIF.
    VideoToGif,
    /// Turn a voice message into an mp3.
    VoiceToAudio,
}

impl ModuleChoice {
    fn media(self) -> MediaKind {
        match self {
            Self::TagEditor | Self::MusicCutter | Self::MusicToVoice => MediaKind::Audio,
            Self::VideoToNote | Self::VideoToGif => MediaKind::Video,
            Self::VoiceToAudio => MediaKind::Voice,
        }
    }
}

/// Finishing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// `/done` and `/preview`.
    Tags,
    /// `/vdone` and `/vpreview`.
    Video,
    /// `/vadone` and `/vapreview`.
    Voice,
}

impl Finish {
    fn media(self) -> MediaKind {
        match self {
            Self::Tags => MediaKind::Audio,
            Self::Video => MediaKind::Video,
            Self::Voice => MediaKind::Voice,
        }
    }
}

/// Why a request does not fit the conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No file has been sent yet.
    NoFile,
    /// The loaded file is of another kind.
    WrongMedia,
    /// The right file is loaded but the matching module was not picked.
    NotEditing,
    /// In the tag editor without the expected tag chosen.
    NoTagChosen,
}

/// Result of picking a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    /// Show the tags and the tag keyboard.
    TagEditor,
    /// Ask for a range; the track is this long.
    MusicCutter {
        /// Track length in seconds.
        duration_secs: u32,
    },
    /// Ask the user to confirm with `/vdone`.
    VideoConverter(VideoTarget),
    /// Ask the user to confirm with `/vadone`.
    VoiceConverter,
    /// Start this job right away.
    Job(Job),
}

/// Result of a plain text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    /// The tag now holds the text.
    TagUpdated(TagField),
    /// The tag only takes numbers; nothing changed.
    ExpectedNumber(TagField),
    /// Album art was chosen; a photo is expected, not text.
    AwaitingPhoto,
    /// A valid range was given.
    Cut(Job),
    /// The range could not be used.
    BadRange(CutRangeError),
}

/// Work the Telegram layer carries out once a file is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Save edited tags and send the music back.
    SaveTags {
        /// Music file.
        path: PathBuf,
        /// Tags to write.
        tags: TagSet,
        /// Cover to embed; `None` leaves the existing cover alone.
        new_artwork: Option<PathBuf>,
        /// Thumbnail for the uploaded audio.
        thumbnail: Option<PathBuf>,
        /// Track length in seconds.
        duration_secs: u32,
        /// Message to reply to.
        reply_to: i32,
    },
    /// Cut a section of the music and send it back.
    CutAudio {
        /// Music file.
        path: PathBuf,
        /// Section to keep.
        range: CutRange,
        /// Message to reply to.
        reply_to: i32,
    },
    /// Send the music back as a voice message.
    AudioToVoice {
        /// Music file.
        path: PathBuf,
        /// Message to reply to.
        reply_to: i32,
    },
    /// Convert a video into a GIF or a round note.
    ConvertVideo {
        /// Video file.
        path: PathBuf,
        /// Output kind.
        target: VideoTarget,
        /// Message to reply to.
        reply_to: i32,
    },
    /// Convert a voice message to an mp3.
    VoiceToAudio {
        /// Voice file.
        path: PathBuf,
        /// Length in seconds.
        duration_secs: u32,
        /// Message to reply to.
        reply_to: i32,
    },
}

/// What `/preview`, `/vpreview` and `/vapreview` show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Current tags and the cover that would be embedded.
    Tags {
        /// Edited tags.
        tags: TagSet,
        /// New cover if one was sent, else the original one.
        art_path: Option<PathBuf>,
    },
    /// The pending video conversion.
    Video {
        /// Requested output.
        target: VideoTarget,
        /// Video length in seconds.
        duration_secs: u32,
    },
    /// The pending voice conversion.
    Voice {
        /// Voice length in seconds.
        duration_secs: u32,
    },
}

/// Conversation state of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    language: Language,
    #[serde(default)]
    file: Loaded,
    #[serde(default)]
    module: Module,
}

impl Session {
    /// Empty session in `language`.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Interface language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the interface language. The loaded file is kept.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Attached file.
    pub fn file(&self) -> &Loaded {
        &self.file
    }

    /// Current module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Kind of the attached file, if any.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self.file {
            Loaded::Nothing => None,
            Loaded::Audio(_) => Some(MediaKind::Audio),
            Loaded::Video(_) => Some(MediaKind::Video),
            Loaded::Voice(_) => Some(MediaKind::Voice),
        }
    }

    /// Drop the file and module, keeping the language.
    ///
    /// Returns every file the session owned so the caller can delete them.
    pub fn reset(&mut self) -> Vec<PathBuf> {
        self.module = Module::Selecting;
        owned_paths(std::mem::take(&mut self.file))
    }

    /// Replace the attached file with a music file.
    ///
    /// Returns the paths of the superseded file.
    pub fn attach_audio(&mut self, audio: AudioFile) -> Vec<PathBuf> {
        self.attach(Loaded::Audio(audio))
    }

    /// Replace the attached file with a video.
    pub fn attach_video(&mut self, video: ClipFile) -> Vec<PathBuf> {
        self.attach(Loaded::Video(video))
    }

    /// Replace the attached file with a voice message.
    pub fn attach_voice(&mut self, voice: ClipFile) -> Vec<PathBuf> {
        self.attach(Loaded::Voice(voice))
    }

    fn attach(&mut self, file: Loaded) -> Vec<PathBuf> {
        let mut superseded = self.reset();
        let kept = owned_paths(file.clone());
        superseded.retain(|p| !kept.contains(p));
        self.file = file;
        superseded
    }

    fn check_media(&self, wanted: MediaKind) -> Result<(), Rejection> {
        match self.media_kind() {
            None => Err(Rejection::NoFile),
            Some(kind) if kind == wanted => Ok(()),
            Some(_) => Err(Rejection::WrongMedia),
        }
    }

    /// Leave the current module and go back to the module selector.
    ///
    /// Returns the kind of the file so the matching keyboard can be shown.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoFile`] when nothing is loaded.
    pub fn back(&mut self) -> Result<MediaKind, Rejection> {
        let kind = self.media_kind().ok_or(Rejection::NoFile)?;
        self.module = Module::Selecting;
        Ok(kind)
    }

    /// Enter the module picked on a selector keyboard.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoFile`] without a file, [`Rejection::WrongMedia`] when
    /// the module does not apply to the loaded file.
    pub fn select(&mut self, choice: ModuleChoice) -> Result<Selected, Rejection> {
        self.check_media(choice.media())?;
        let selected = match (choice, &self.file) {
            (ModuleChoice::TagEditor, _) => {
                self.module = Module::TagEditor { editing: None };
                Selected::TagEditor
            }
            (ModuleChoice::MusicCutter, Loaded::Audio(audio)) => {
                let duration_secs = audio.duration_secs;
                self.module = Module::MusicCutter;
                Selected::MusicCutter { duration_secs }
            }
            (ModuleChoice::MusicToVoice, Loaded::Audio(audio)) => {
                let job = Job::AudioToVoice {
                    path: audio.path.clone(),
                    reply_to: audio.message_id,
                };
                self.module = Module::Selecting;
                Selected::Job(job)
            }
            (ModuleChoice::VideoToNote, _) => {
                self.module = Module::VideoConverter {
                    target: VideoTarget::Note,
                };
                Selected::VideoConverter(VideoTarget::Note)
            }
            (ModuleChoice::VideoToGif, _) => {
                self.module = Module::VideoConverter {
                    target: VideoTarget::Gif,
                };
                Selected::VideoConverter(VideoTarget::Gif)
            }
            (ModuleChoice::VoiceToAudio, _) => {
                self.module = Module::VoiceConverter;
                Selected::VoiceConverter
            }
            _ => return Err(Rejection::WrongMedia),
        };
        Ok(selected)
    }

    /// Remember which tag the next text (or photo) sets.
    ///
    /// # Errors
    ///
    /// [`Rejection::NotEditing`] outside the tag editor, plus the media
    /// rejections of [`Session::select`].
    pub fn choose_tag(&mut self, field: TagField) -> Result<TagField, Rejection> {
        self.check_media(MediaKind::Audio)?;
        match &mut self.module {
            Module::TagEditor { editing } => {
                *editing = Some(field);
                Ok(field)
            }
            _ => Err(Rejection::NotEditing),
        }
    }

    /// Handle a plain text message.
    ///
    /// In the tag editor the text becomes the value of the chosen tag; in
    /// the music cutter it is parsed as a range.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoTagChosen`] in the tag editor before a tag was
    /// picked, [`Rejection::NotEditing`] when no module takes text, plus
    /// the media rejections.
    pub fn submit_text(&mut self, text: &str) -> Result<TextOutcome, Rejection> {
        let Loaded::Audio(audio) = &mut self.file else {
            return Err(match self.file {
                Loaded::Nothing => Rejection::NoFile,
                _ => Rejection::NotEditing,
            });
        };
        match &self.module {
            Module::TagEditor { editing: None } => Err(Rejection::NoTagChosen),
            Module::TagEditor {
                editing: Some(TagField::AlbumArt),
            } => Ok(TextOutcome::AwaitingPhoto),
            Module::TagEditor {
                editing: Some(field),
            } => {
                let field = *field;
                match audio.tags.set(field, text) {
                    Ok(()) => Ok(TextOutcome::TagUpdated(field)),
                    Err(_) => Ok(TextOutcome::ExpectedNumber(field)),
                }
            }
            Module::MusicCutter => match CutRange::parse(text, audio.duration_secs) {
                Ok(range) => Ok(TextOutcome::Cut(Job::CutAudio {
                    path: audio.path.clone(),
                    range,
                    reply_to: audio.message_id,
                })),
                Err(e) => Ok(TextOutcome::BadRange(e)),
            },
            _ => Err(Rejection::NotEditing),
        }
    }

    /// Check whether a photo would be taken as the new album art.
    ///
    /// Lets the caller skip downloading photos nobody asked for.
    ///
    /// # Errors
    ///
    /// [`Rejection::NotEditing`] outside the tag editor and
    /// [`Rejection::NoTagChosen`] unless album art was chosen, plus the
    /// media rejections.
    pub fn expects_art(&self) -> Result<(), Rejection> {
        self.check_media(MediaKind::Audio)?;
        match self.module {
            Module::TagEditor {
                editing: Some(TagField::AlbumArt),
            } => Ok(()),
            Module::TagEditor { .. } => Err(Rejection::NoTagChosen),
            _ => Err(Rejection::NotEditing),
        }
    }

    /// Take a downloaded photo as the new album art.
    ///
    /// Returns a previously sent replacement cover, which is no longer
    /// needed.
    ///
    /// # Errors
    ///
    /// Same as [`Session::expects_art`].
    pub fn accept_art(&mut self, path: PathBuf) -> Result<Option<PathBuf>, Rejection> {
        self.expects_art()?;
        match &mut self.file {
            Loaded::Audio(audio) => Ok(audio.new_art_path.replace(path)),
            _ => Err(Rejection::WrongMedia),
        }
    }

    /// Build the job behind `/done`, `/vdone` or `/vadone`.
    ///
    /// The session is left untouched; the caller resets it once the job
    /// has been carried out.
    ///
    /// # Errors
    ///
    /// [`Rejection::NotEditing`] when the matching module was not picked,
    /// plus the media rejections.
    pub fn finish(&self, kind: Finish) -> Result<Job, Rejection> {
        self.check_media(kind.media())?;
        match (&self.module, &self.file) {
            (Module::TagEditor { .. }, Loaded::Audio(audio)) => Ok(Job::SaveTags {
                path: audio.path.clone(),
                tags: audio.tags.clone(),
                new_artwork: audio.new_art_path.clone(),
                thumbnail: audio
                    .new_art_path
                    .clone()
                    .or_else(|| audio.art_path.clone()),
                duration_secs: audio.duration_secs,
                reply_to: audio.message_id,
            }),
            (Module::VideoConverter { target }, Loaded::Video(video)) => Ok(Job::ConvertVideo {
                path: video.path.clone(),
                target: *target,
                reply_to: video.message_id,
            }),
            (Module::VoiceConverter, Loaded::Voice(voice)) => Ok(Job::VoiceToAudio {
                path: voice.path.clone(),
                duration_secs: voice.duration_secs,
                reply_to: voice.message_id,
            }),
            _ => Err(Rejection::NotEditing),
        }
    }

    /// Summary shown by the preview commands.
    ///
    /// # Errors
    ///
    /// Same as [`Session::finish`].
    pub fn preview(&self, kind: Finish) -> Result<Preview, Rejection> {
        match self.finish(kind)? {
            Job::SaveTags { tags, thumbnail, .. } => Ok(Preview::Tags {
                tags,
                art_path: thumbnail,
            }),
            Job::ConvertVideo { target, .. } => {
                let duration_secs = match &self.file {
                    Loaded::Video(video) => video.duration_secs,
                    _ => 0,
                };
                Ok(Preview::Video {
                    target,
                    duration_secs,
                })
            }
            Job::VoiceToAudio { duration_secs, .. } => Ok(Preview::Voice { duration_secs }),
            Job::CutAudio { .. } | Job::AudioToVoice { .. } => Err(Rejection::NotEditing),
        }
    }
}

fn owned_paths(file: Loaded) -> Vec<PathBuf> {
    match file {
        Loaded::Nothing => Vec::new(),
        Loaded::Audio(audio) => std::iter::once(audio.path)
            .chain(audio.art_path)
            .chain(audio.new_art_path)
            .collect(),
        Loaded::Video(clip) | Loaded::Voice(clip) => vec![clip.path],
    }
}
