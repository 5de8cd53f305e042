//! Localized user-facing strings.
//!
//! Every message the bot sends is looked up through [`translate`] so the
//! conversation can switch between English and Farsi at any point.

use serde::{Deserialize, Serialize};

/// Placeholder substituted by [`translate_with`].
const PLACEHOLDER: &str = "{}";

/// Interface language of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Farsi.
    Fa,
}

impl Language {
    /// Returns the code stored in SQLite (`en` / `fa`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fa => "fa",
        }
    }

    /// Parse a stored language code, falling back to English.
    pub fn from_code(code: &str) -> Self {
        match code {
            "fa" => Self::Fa,
            _ => Self::En,
        }
    }

    /// Label of the language chooser button for this language.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::En => "\u{1F1EC}\u{1F1E7} English",
            Self::Fa => "\u{1F1EE}\u{1F1F7} فارسی",
        }
    }

    /// All supported languages, in keyboard order.
    pub const ALL: [Language; 2] = [Language::En, Language::Fa];
}

/// Identifier of a translated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MessageKey {
    Start,
    StartOver,
    Help,
    About,
    Default,
    ChooseLanguage,
    LanguageChanged,
    AskWhichModule,
    AskWhichTag,
    AskForArtist,
    AskForTitle,
    AskForAlbum,
    AskForGenre,
    AskForYear,
    AskForDiskNumber,
    AskForTrackNumber,
    AskForAlbumArt,
    AlbumArtChanged,
    TagChanged,
    ExpectedNumber,
    ClickPreview,
    ClickDone,
    ClickVideoPreview,
    ClickVideoDone,
    ClickVoicePreview,
    ClickVoiceDone,
    VideoPreview,
    VoicePreview,
    MusicLength,
    AskCutRange,
    ReportBug,
    ErrCreatingUserFolder,
    ErrOnDownloadAudio,
    ErrOnDownloadPhoto,
    ErrOnDownloadVideo,
    ErrOnDownloadVoice,
    ErrTooLargeFile,
    ErrOnReadingTags,
    ErrOnUpdatingTags,
    ErrOnUploading,
    ErrOnConverting,
    ErrOutOfRange,
    ErrMalformedRange,
    BtnTagEditor,
    BtnMusicCutter,
    BtnMusicToVoice,
    BtnArtist,
    BtnTitle,
    BtnAlbum,
    BtnGenre,
    BtnYear,
    BtnDiskNumber,
    BtnTrackNumber,
    BtnAlbumArt,
    BtnBack,
    BtnNewFile,
    BtnVideoToNote,
    BtnVideoToGif,
    BtnVoiceToAudio,
    Or,
}

/// Look up `key` in the string table for `lang`.
pub fn translate(key: MessageKey, lang: Language) -> &'static str {
    let (en, fa) = entry(key);
    match lang {
        Language::En => en,
        Language::Fa => fa,
    }
}

/// Look up `key` and substitute the first `{}` with `arg`.
pub fn translate_with(key: MessageKey, lang: Language, arg: &str) -> String {
    translate(key, lang).replacen(PLACEHOLDER, arg, 1)
}

fn entry(key: MessageKey) -> (&'static str, &'static str) {
    use MessageKey::*;

    match key {
        Start => (
            "Hello there! \u{1F44B}\nLet's get started. Just send me a music, a voice or a video and see how awesome I am!",
            "سلام! \u{1F44B}\nخب شروع کنیم. یه موزیک، ویس یا ویدیو برام بفرست تا ببینی چقدر خفنم!",
        ),
        StartOver => (
            "Send me a music, a voice or a video and see how awesome I am!",
            "یه موزیک، ویس یا ویدیو برام بفرست تا ببینی چقدر خفنم!",
        ),
        Help => (
            "It's simple! Just send or forward me an audio track, a voice message or a video. I'm waiting... \u{1F601}",
            "ساده س! یه فایل صوتی، ویس یا ویدیو برام بفرست. منتظرم... \u{1F601}",
        ),
        About => (
            "This bot edits music tags and converts voices and videos.",
            "این ربات تگ موزیک ها رو ویرایش میکنه و ویس و ویدیو ها رو تبدیل میکنه.",
        ),
        Default => (
            "Send or forward me an audio track, a voice message or a video. I'm waiting... \u{1F601}",
            "یه فایل صوتی، ویس یا ویدیو برام بفرست... منتظرم... \u{1F601}",
        ),
        ChooseLanguage => (
            "Please choose a language:",
            "لطفا زبان مورد نظرت رو انتخاب کن:",
        ),
        LanguageChanged => (
            "Language has been changed. If you want to change the language later, use /language command.",
            "زبان تغییر یافت. اگر میخواهید زبان را مجددا تغییر دهید، از دستور /language استفاده کنید.",
        ),
        AskWhichModule => (
            "What do you want to do with this file?",
            "میخوای با این فایل چیکار کنی؟",
        ),
        AskWhichTag => (
            "Which tag do you want to edit?",
            "چه تگی رو میخوای ویرایش کنی؟",
        ),
        AskForArtist => (
            "Enter the name of the artist:",
            "نام خواننده رو وارد کن:",
        ),
        AskForTitle => ("Enter the title:", "عنوان رو وارد کن:"),
        AskForAlbum => (
            "Enter the name of the album:",
            "نام آلبوم رو وارد کن:",
        ),
        AskForGenre => ("Enter the genre:", "ژانر رو وارد کن:"),
        AskForYear => (
            "Enter the publish year (e.g. 2021):",
            "سال انتشار رو وارد کن (مثل 2021):",
        ),
        AskForDiskNumber => (
            "Enter the disk number (e.g. 1):",
            "شماره دیسک رو وارد کن (مثل 1):",
        ),
        AskForTrackNumber => (
            "Enter the track number (e.g. 5):",
            "شماره ترک رو وارد کن (مثل 5):",
        ),
        AskForAlbumArt => ("Send me a photo:", "یک عکس برام بفرست:"),
        AlbumArtChanged => ("Album art changed.", "عکس آلبوم تغییر کرد."),
        TagChanged => ("{} changed.", "{} تغییر کرد."),
        ExpectedNumber => (
            "Please send a number, e.g. 2021.",
            "لطفا یک عدد بفرست، مثل 2021.",
        ),
        ClickPreview => (
            "If you want to preview your changes click /preview.",
            "اگر میخوای تغییرات رو تا الان ببینی از دستور /preview استفاده کن.",
        ),
        ClickDone => (
            "Click /done to save your changes.",
            "روی /done کلیک کن تا تغییراتت ذخیره بشن.",
        ),
        ClickVideoPreview => (
            "If you want to check the conversion click /vpreview.",
            "اگر میخوای تبدیل رو بررسی کنی از دستور /vpreview استفاده کن.",
        ),
        ClickVideoDone => (
            "Click /vdone to convert your video.",
            "روی /vdone کلیک کن تا ویدیوت تبدیل بشه.",
        ),
        ClickVoicePreview => (
            "If you want to check the conversion click /vapreview.",
            "اگر میخوای تبدیل رو بررسی کنی از دستور /vapreview استفاده کن.",
        ),
        ClickVoiceDone => (
            "Click /vadone to convert your voice.",
            "روی /vadone کلیک کن تا ویست تبدیل بشه.",
        ),
        VideoPreview => (
            "Your video ({}) is ready to be converted.",
            "ویدیوی شما ({}) آماده تبدیل است.",
        ),
        VoicePreview => (
            "Your voice ({}) will be converted to an MP3 audio.",
            "ویس شما ({}) به یک فایل MP3 تبدیل خواهد شد.",
        ),
        MusicLength => ("The file length is {}.", "طول کل فایل {} است."),
        AskCutRange => (
            "Send me the part you want to keep, e.g. 00:30-01:45.",
            "بازه ای که میخوای نگه داری رو بفرست، مثل 00:30-01:45.",
        ),
        ReportBug => (
            "That's my fault! Please send a bug report to the bot admin.",
            "این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrCreatingUserFolder => (
            "Error on starting... That's my fault! Please send a bug report to the bot admin.",
            "به مشکل خوردم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOnDownloadAudio => (
            "Sorry, I couldn't download your file... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم فایلت رو دانلود کنم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOnDownloadPhoto => (
            "Sorry, I couldn't download your photo... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم عکست رو دانلود کنم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOnDownloadVideo => (
            "Sorry, I couldn't download your video... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم ویدیوت رو دانلود کنم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOnDownloadVoice => (
            "Sorry, I couldn't download your voice... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم ویست رو دانلود کنم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrTooLargeFile => (
            "This file is too big that I can process, sorry!",
            "این فایل بزرگتر از چیزی هست که من بتونم پردازش کنم، شرمنده!",
        ),
        ErrOnReadingTags => (
            "Sorry, I couldn't read the tags of the file... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم تگ های فایل رو بخونم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOnUpdatingTags => (
            "Sorry, I couldn't update the tags of the file... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم تگ های فایل رو آپدیت کنم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOnUploading => (
            "Sorry, due to network issues, I couldn't upload your file. Please try again.",
            "متاسفم. به دلیل اشکالات شبکه نتونستم فایل رو آپلود کنم. لطفا دوباره امتحان کن.",
        ),
        ErrOnConverting => (
            "Sorry, I couldn't convert your file... That's my fault! Please send a bug report to the bot admin.",
            "متاسفم، نتونستم فایلت رو تبدیل کنم... این اشتباه منه! لطفا این باگ رو به ادمین ربات گزارش کنید.",
        ),
        ErrOutOfRange => (
            "The range is out of the file length. The file length is {}.",
            "بازه خارج از طول فایله. طول فایل {} است.",
        ),
        ErrMalformedRange => (
            "I couldn't understand the range. Send it like 00:30-01:45.",
            "بازه رو متوجه نشدم. به این شکل بفرست: 00:30-01:45.",
        ),
        BtnTagEditor => ("\u{1F3B5} Tag Editor", "\u{1F3B5} تغییر تگ ها"),
        BtnMusicCutter => ("\u{2702}\u{FE0F} Music Cutter", "\u{2702}\u{FE0F} برش موزیک"),
        BtnMusicToVoice => (
            "\u{1F5E3} Music to Voice Converter",
            "\u{1F5E3} تبدیل به پیام صوتی",
        ),
        BtnArtist => ("\u{1F3A4} Artist", "\u{1F3A4} خواننده"),
        BtnTitle => ("\u{1F3B6} Title", "\u{1F3B6} عنوان"),
        BtnAlbum => ("\u{1F3BC} Album", "\u{1F3BC} آلبوم"),
        BtnGenre => ("\u{1F3B9} Genre", "\u{1F3B9} ژانر"),
        BtnYear => ("\u{1F4C5} Year", "\u{1F4C5} سال"),
        BtnDiskNumber => ("\u{1F4BF} Disk Number", "\u{1F4BF} شماره دیسک"),
        BtnTrackNumber => ("\u{25B6}\u{FE0F} Track Number", "\u{25B6}\u{FE0F} شماره ترک"),
        BtnAlbumArt => ("\u{1F5BC} Album Art", "\u{1F5BC} عکس آلبوم"),
        BtnBack => ("\u{1F519} Back", "\u{1F519} بازگشت"),
        BtnNewFile => ("\u{1F195} New File", "\u{1F195} فایل جدید"),
        BtnVideoToNote => (
            "\u{2B55} Convert to Circular Video",
            "\u{2B55} تبدیل به ویدیو دایره ای",
        ),
        BtnVideoToGif => (
            "\u{1F39E} Convert Video to GIF",
            "\u{1F39E} تبدیل ویدیو به گیف",
        ),
        BtnVoiceToAudio => (
            "\u{1F3A7} Convert Voice to Audio",
            "\u{1F3A7} تبدیل ویس به آهنگ",
        ),
        Or => ("or", "یا"),
    }
}
