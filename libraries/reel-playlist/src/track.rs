//! Track value object
//!
//! A track is a media locator plus descriptive metadata. Identity is fixed at
//! creation: clones of a track share its [`TrackId`], which is how a playlist
//! tells "the same track" apart from "a track with the same file".

use crate::error::{PlaylistError, Result};
use crate::merge::deep_merge;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stable identity of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(Uuid);

impl TrackId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque reference to playable media (file path, URL, platform handle)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&Path> for Locator {
    fn from(value: &Path) -> Self {
        Self(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Locator {
    fn from(value: PathBuf) -> Self {
        Self::from(value.as_path())
    }
}

/// Descriptive metadata for a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title (default: "Untitled")
    pub name: String,

    /// Artist name (default: "Unknown")
    pub artist: String,

    /// Album name (default: "N/A")
    pub album: String,

    /// Genres in display order (default: empty)
    pub genre: Vec<String>,

    /// Release year (default: the year the track was created)
    pub year: i32,

    /// Caller-supplied keys with no defined meaning, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            artist: "Unknown".to_string(),
            album: "N/A".to_string(),
            genre: Vec::new(),
            year: chrono::Local::now().year(),
            extra: Map::new(),
        }
    }
}

impl TrackMetadata {
    /// Build metadata from caller overrides merged over the defaults
    ///
    /// Fails with [`PlaylistError::Validation`] when `genre` is present but not
    /// a list, or when any known field has the wrong type.
    pub fn from_overrides(overrides: Value) -> Result<Self> {
        if let Some(genre) = overrides.get("genre") {
            if !genre.is_array() {
                return Err(PlaylistError::Validation(
                    "genre must be a list of strings".to_string(),
                ));
            }
        }

        let defaults = serde_json::to_value(Self::default())
            .map_err(|e| PlaylistError::Validation(e.to_string()))?;

        serde_json::from_value(deep_merge(defaults, overrides))
            .map_err(|e| PlaylistError::Validation(format!("invalid track metadata: {e}")))
    }
}

/// A single playable media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    id: TrackId,
    locator: Locator,
    metadata: TrackMetadata,
}

impl Track {
    /// Create a track with default metadata
    pub fn new(locator: impl Into<Locator>) -> Self {
        Self {
            id: TrackId::new(),
            locator: locator.into(),
            metadata: TrackMetadata::default(),
        }
    }

    /// Create a track whose metadata is `overrides` deep-merged over the defaults
    ///
    /// ```rust
    /// use reel_playlist::Track;
    /// use serde_json::json;
    ///
    /// let track = Track::with_metadata(
    ///     "/music/intro.ogg",
    ///     json!({ "name": "Intro", "genre": ["ambient"] }),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(track.name(), "Intro");
    /// assert_eq!(track.artist(), "Unknown");
    /// ```
    pub fn with_metadata(locator: impl Into<Locator>, overrides: Value) -> Result<Self> {
        Ok(Self {
            id: TrackId::new(),
            locator: locator.into(),
            metadata: TrackMetadata::from_overrides(overrides)?,
        })
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    /// Whether `other` is the same track (not merely the same media)
    pub fn is_same(&self, other: &Track) -> bool {
        self.id == other.id
    }

    // ===== Metadata =====

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = name.into();
    }

    pub fn artist(&self) -> &str {
        &self.metadata.artist
    }

    pub fn set_artist(&mut self, artist: impl Into<String>) {
        self.metadata.artist = artist.into();
    }

    pub fn album(&self) -> &str {
        &self.metadata.album
    }

    pub fn set_album(&mut self, album: impl Into<String>) {
        self.metadata.album = album.into();
    }

    pub fn year(&self) -> i32 {
        self.metadata.year
    }

    pub fn set_year(&mut self, year: i32) {
        self.metadata.year = year;
    }

    pub fn genre(&self) -> &[String] {
        &self.metadata.genre
    }

    pub fn set_genre(&mut self, genre: Vec<String>) {
        self.metadata.genre = genre;
    }

    pub fn add_genre(&mut self, genre: impl Into<String>) {
        self.metadata.genre.push(genre.into());
    }

    /// Remove the first genre equal to `genre`
    pub fn remove_genre(&mut self, genre: &str) -> Result<String> {
        let position = self
            .metadata
            .genre
            .iter()
            .position(|g| g == genre)
            .ok_or_else(|| {
                PlaylistError::NotFound(format!(
                    "genre \"{}\" on track \"{}\"",
                    genre, self.metadata.name
                ))
            })?;
        Ok(self.metadata.genre.remove(position))
    }

    /// Remove the genre at a 0-based position
    pub fn remove_genre_at(&mut self, index: usize) -> Result<String> {
        let len = self.metadata.genre.len();
        if index >= len {
            return Err(PlaylistError::Range { index, len });
        }
        Ok(self.metadata.genre.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_applied() {
        let track = Track::new("/music/a.mp3");

        assert_eq!(track.name(), "Untitled");
        assert_eq!(track.artist(), "Unknown");
        assert_eq!(track.album(), "N/A");
        assert!(track.genre().is_empty());
        assert_eq!(track.year(), chrono::Local::now().year());
        assert_eq!(track.locator().as_str(), "/music/a.mp3");
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let track = Track::with_metadata(
            "/music/b.flac",
            json!({"name": "Blue", "artist": "Band", "year": 1999, "mood": {"calm": true}}),
        )
        .unwrap();

        assert_eq!(track.name(), "Blue");
        assert_eq!(track.artist(), "Band");
        assert_eq!(track.album(), "N/A");
        assert_eq!(track.year(), 1999);
        assert_eq!(track.metadata().extra["mood"], json!({"calm": true}));
    }

    #[test]
    fn non_list_genre_rejected() {
        let err = Track::with_metadata("/music/c.mp3", json!({"genre": "rock"})).unwrap_err();
        assert!(matches!(err, PlaylistError::Validation(_)));
    }

    #[test]
    fn wrongly_typed_field_rejected() {
        let err = Track::with_metadata("/music/c.mp3", json!({"year": "last year"})).unwrap_err();
        assert!(matches!(err, PlaylistError::Validation(_)));
    }

    #[test]
    fn clones_share_identity() {
        let track = Track::new("/music/d.mp3");
        let copy = track.clone();
        let other = Track::new("/music/d.mp3");

        assert!(track.is_same(&copy));
        assert!(!track.is_same(&other));
    }

    #[test]
    fn genre_editing() {
        let mut track = Track::with_metadata("/x.mp3", json!({"genre": ["rock", "jazz"]})).unwrap();

        track.add_genre("funk");
        assert_eq!(track.genre(), ["rock", "jazz", "funk"]);

        assert_eq!(track.remove_genre("jazz").unwrap(), "jazz");
        assert_eq!(track.remove_genre_at(1).unwrap(), "funk");
        assert_eq!(track.genre(), ["rock"]);

        assert!(matches!(
            track.remove_genre("polka"),
            Err(PlaylistError::NotFound(_))
        ));
        assert_eq!(
            track.remove_genre_at(3),
            Err(PlaylistError::Range { index: 3, len: 1 })
        );
    }

    #[test]
    fn locator_from_path() {
        let locator = Locator::from(PathBuf::from("/music/e.wav"));
        assert_eq!(locator.as_str(), "/music/e.wav");
        assert!(!locator.is_empty());
        assert!(Locator::from("  ").is_empty());
    }
}
