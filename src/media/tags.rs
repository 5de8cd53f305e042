//! Audio tag inspection and editing backed by `lofty`.
//!
//! Tag values are kept as the strings the user typed; numbers are only
//! parsed when the tags are written back to the file. All functions here
//! are blocking and should run inside `tokio::task::spawn_blocking`.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{Accessor, Tag, TagExt};
use serde::{Deserialize, Serialize};

use crate::i18n::MessageKey;

/// Errors from reading or writing audio tags.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// `lofty` could not parse or save the file.
    #[error("tag library error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),

    /// The new album art could not be read from disk.
    #[error("failed to read artwork: {0}")]
    Artwork(#[source] std::io::Error),

    /// A numeric tag holds a value that is not a number.
    #[error("{field:?} expects a number, got {value:?}")]
    InvalidNumber {
        /// Which tag held the value.
        field: TagField,
        /// The offending value.
        value: String,
    },

    /// The container has no writable tag type.
    #[error("file format does not support tags")]
    Unsupported,
}

/// An editable tag of a music file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    /// Performing artist.
    Artist,
    /// Track title.
    Title,
    /// Album name.
    Album,
    /// Genre.
    Genre,
    /// Release year.
    Year,
    /// Disk number within a set.
    DiskNumber,
    /// Track number within the album.
    TrackNumber,
    /// Front cover picture.
    AlbumArt,
}

impl TagField {
    /// Fields that hold text typed by the user, in keyboard order.
    pub const TEXT_FIELDS: [TagField; 7] = [
        TagField::Artist,
        TagField::Title,
        TagField::Album,
        TagField::Genre,
        TagField::Year,
        TagField::DiskNumber,
        TagField::TrackNumber,
    ];

    /// Whether the field only accepts whole numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Year | Self::DiskNumber | Self::TrackNumber)
    }

    /// Keyboard button for the field.
    pub fn button_key(&self) -> MessageKey {
        match self {
            Self::Artist => MessageKey::BtnArtist,
            Self::Title => MessageKey::BtnTitle,
            Self::Album => MessageKey::BtnAlbum,
            Self::Genre => MessageKey::BtnGenre,
            Self::Year => MessageKey::BtnYear,
            Self::DiskNumber => MessageKey::BtnDiskNumber,
            Self::TrackNumber => MessageKey::BtnTrackNumber,
            Self::AlbumArt => MessageKey::BtnAlbumArt,
        }
    }

    /// Prompt asking the user for the field's new value.
    pub fn prompt_key(&self) -> MessageKey {
        match self {
            Self::Artist => MessageKey::AskForArtist,
            Self::Title => MessageKey::AskForTitle,
            Self::Album => MessageKey::AskForAlbum,
            Self::Genre => MessageKey::AskForGenre,
            Self::Year => MessageKey::AskForYear,
            Self::DiskNumber => MessageKey::AskForDiskNumber,
            Self::TrackNumber => MessageKey::AskForTrackNumber,
            Self::AlbumArt => MessageKey::AskForAlbumArt,
        }
    }
}

/// Text tags of a music file as shown to and edited by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    /// Performing artist.
    pub artist: String,
    /// Track title.
    pub title: String,
    /// Album name.
    pub album: String,
    /// Genre.
    pub genre: String,
    /// Release year.
    pub year: String,
    /// Disk number.
    pub disk_number: String,
    /// Track number.
    pub track_number: String,
}

impl TagSet {
    /// Current value of a text field. `AlbumArt` has no text value.
    pub fn get(&self, field: TagField) -> &str {
        match field {
            TagField::Artist => &self.artist,
            TagField::Title => &self.title,
            TagField::Album => &self.album,
            TagField::Genre => &self.genre,
            TagField::Year => &self.year,
            TagField::DiskNumber => &self.disk_number,
            TagField::TrackNumber => &self.track_number,
            TagField::AlbumArt => "",
        }
    }

    /// Replace a text field with a trimmed value.
    ///
    /// Numeric fields are validated so bad input is rejected while the
    /// user is still in the editor, not when the file is saved.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidNumber`] for a non-numeric value in a
    /// numeric field.
    pub fn set(&mut self, field: TagField, value: &str) -> Result<(), TagError> {
        let value = value.trim();
        if field.is_numeric() {
            parse_number(field, value)?;
        }
        let slot = match field {
            TagField::Artist => &mut self.artist,
            TagField::Title => &mut self.title,
            TagField::Album => &mut self.album,
            TagField::Genre => &mut self.genre,
            TagField::Year => &mut self.year,
            TagField::DiskNumber => &mut self.disk_number,
            TagField::TrackNumber => &mut self.track_number,
            TagField::AlbumArt => return Ok(()),
        };
        value.clone_into(slot);
        Ok(())
    }
}

/// Everything extracted from a freshly downloaded music file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioMetadata {
    /// Text tags.
    pub tags: TagSet,
    /// Raw bytes of the embedded front cover, if any.
    pub artwork: Option<Vec<u8>>,
    /// Playback length in whole seconds.
    pub duration_secs: u32,
}

/// Parse a numeric tag value. Empty means "unset".
///
/// # Errors
///
/// Returns [`TagError::InvalidNumber`] if the value is not a `u32`.
pub fn parse_number(field: TagField, value: &str) -> Result<Option<u32>, TagError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| TagError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}

/// Read tags, front cover and duration from an audio file.
///
/// Files without any tag yield an empty [`TagSet`].
///
/// # Errors
///
/// Returns [`TagError::Lofty`] if the file cannot be parsed.
pub fn read_tags(path: &Path) -> Result<AudioMetadata, TagError> {
    let tagged = lofty::read_from_path(path)?;
    let duration_secs =
        u32::try_from(tagged.properties().duration().as_secs()).unwrap_or(u32::MAX);

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return Ok(AudioMetadata {
            duration_secs,
            ..AudioMetadata::default()
        });
    };

    let text = |value: Option<std::borrow::Cow<'_, str>>| {
        value.map(|v| v.trim().to_owned()).unwrap_or_default()
    };
    let number = |value: Option<u32>| value.map(|n| n.to_string()).unwrap_or_default();

    let tags = TagSet {
        artist: text(tag.artist()),
        title: text(tag.title()),
        album: text(tag.album()),
        genre: text(tag.genre()),
        year: number(tag.year()),
        disk_number: number(tag.disk()),
        track_number: number(tag.track()),
    };

    let pictures = tag.pictures();
    let artwork = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .map(|p| p.data().to_vec());

    Ok(AudioMetadata {
        tags,
        artwork,
        duration_secs,
    })
}

/// Write `tags` (and optionally a new front cover) into the file at `path`.
///
/// Empty values remove the corresponding item. When the file carries no
/// tag yet, one of the container's primary tag type is created.
///
/// # Errors
///
/// Returns an error if a numeric value is invalid, the artwork cannot be
/// read, or the file cannot be parsed or saved.
pub fn write_tags(path: &Path, tags: &TagSet, artwork: Option<&Path>) -> Result<(), TagError> {
    let year = parse_number(TagField::Year, &tags.year)?;
    let disk = parse_number(TagField::DiskNumber, &tags.disk_number)?;
    let track = parse_number(TagField::TrackNumber, &tags.track_number)?;
    let artwork = artwork
        .map(std::fs::read)
        .transpose()
        .map_err(TagError::Artwork)?;

    let mut tagged = lofty::read_from_path(path)?;
    if tagged.primary_tag().is_none() {
        let tag_type = tagged.primary_tag_type();
        tagged.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged.primary_tag_mut().ok_or(TagError::Unsupported)?;

    set_text(tag, &tags.artist, Tag::set_artist, Tag::remove_artist);
    set_text(tag, &tags.title, Tag::set_title, Tag::remove_title);
    set_text(tag, &tags.album, Tag::set_album, Tag::remove_album);
    set_text(tag, &tags.genre, Tag::set_genre, Tag::remove_genre);

    match year {
        Some(y) => tag.set_year(y),
        None => tag.remove_year(),
    }
    match disk {
        Some(d) => tag.set_disk(d),
        None => tag.remove_disk(),
    }
    match track {
        Some(t) => tag.set_track(t),
        None => tag.remove_track(),
    }

    if let Some(data) = artwork {
        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Jpeg),
            None,
            data,
        ));
    }

    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}

fn set_text(tag: &mut Tag, value: &str, set: fn(&mut Tag, String), remove: fn(&mut Tag)) {
    let value = value.trim();
    if value.is_empty() {
        remove(tag);
    } else {
        set(tag, value.to_owned());
    }
}
