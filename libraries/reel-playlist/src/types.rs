//! Core types for playlist selection and transport

use crate::track::{Locator, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Paused or stopped; the position is still defined
    Idle,

    /// A playback request was issued to the device
    Playing,
}

/// Which track an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRef {
    /// 1-based position in the playlist
    ByIndex(usize),

    /// A member track, compared by identity
    ByReference(TrackId),

    /// Whatever track is currently selected
    ByCurrent,
}

impl From<usize> for TrackRef {
    fn from(index: usize) -> Self {
        TrackRef::ByIndex(index)
    }
}

impl From<&Track> for TrackRef {
    fn from(track: &Track) -> Self {
        TrackRef::ByReference(track.id())
    }
}

impl From<TrackId> for TrackRef {
    fn from(id: TrackId) -> Self {
        TrackRef::ByReference(id)
    }
}

/// Tracks to add: raw locators, existing tracks, or nested lists of either
#[derive(Debug, Clone, PartialEq)]
pub enum TrackInput {
    Locator(Locator),
    Track(Track),
    List(Vec<TrackInput>),
}

impl TrackInput {
    /// Flatten nested lists into tracks, in order
    ///
    /// Locators are wrapped in new tracks with default metadata.
    pub fn into_tracks(self) -> Vec<Track> {
        let mut tracks = Vec::new();
        let mut stack = vec![self];

        while let Some(input) = stack.pop() {
            match input {
                TrackInput::Locator(locator) => tracks.push(Track::new(locator)),
                TrackInput::Track(track) => tracks.push(track),
                // Reversed so the stack yields elements in their original order
                TrackInput::List(items) => stack.extend(items.into_iter().rev()),
            }
        }

        tracks
    }
}

impl From<&str> for TrackInput {
    fn from(value: &str) -> Self {
        TrackInput::Locator(value.into())
    }
}

impl From<String> for TrackInput {
    fn from(value: String) -> Self {
        TrackInput::Locator(value.into())
    }
}

impl From<PathBuf> for TrackInput {
    fn from(value: PathBuf) -> Self {
        TrackInput::Locator(value.into())
    }
}

impl From<Locator> for TrackInput {
    fn from(value: Locator) -> Self {
        TrackInput::Locator(value)
    }
}

impl From<Track> for TrackInput {
    fn from(value: Track) -> Self {
        TrackInput::Track(value)
    }
}

impl<T: Into<TrackInput>> From<Vec<T>> for TrackInput {
    fn from(items: Vec<T>) -> Self {
        TrackInput::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lists_flatten_in_order() {
        let kept = Track::new("/b.mp3");
        let input = TrackInput::List(vec![
            "/a.mp3".into(),
            TrackInput::List(vec![kept.clone().into(), "/c.mp3".into()]),
            TrackInput::List(vec![]),
            "/d.mp3".into(),
        ]);

        let tracks = input.into_tracks();
        let locators: Vec<&str> = tracks.iter().map(|t| t.locator().as_str()).collect();

        assert_eq!(locators, ["/a.mp3", "/b.mp3", "/c.mp3", "/d.mp3"]);
        assert!(tracks[1].is_same(&kept));
    }

    #[test]
    fn track_ref_conversions() {
        let track = Track::new("/a.mp3");
        assert_eq!(TrackRef::from(2usize), TrackRef::ByIndex(2));
        assert_eq!(TrackRef::from(&track), TrackRef::ByReference(track.id()));
    }
}
