//! Playlist Events
//!
//! Event-based communication for UI synchronization. Events are queued as the
//! playlist mutates and drained by the host:
//! - Track changes (same moment the track-changed callback fires)
//! - State changes (play/pause/stop)
//! - Volume and track-list changes
//! - Auto-advance scheduling and rejected playback requests

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaylistEvent {
    /// The selected track index changed
    TrackChanged {
        /// 1-based index before the change
        previous: usize,
        /// 1-based index after the change
        current: usize,
    },

    /// Transport state changed
    StateChanged { state: PlaybackState },

    /// Volume changed
    VolumeChanged { level: f64 },

    /// Tracks were added, removed, or reordered
    TracksChanged { length: usize },

    /// End of media reached; `next()` will run after `delay_ms`
    AutoAdvanceScheduled { delay_ms: u64 },

    /// The device refused a playback request
    PlaybackRejected {
        /// Locator of the track that failed to start
        locator: String,
        /// Device error message
        message: String,
    },
}

/// Pending event buffer
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: Vec<PlaylistEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: PlaylistEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<PlaylistEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_in_order() {
        let mut queue = EventQueue::default();
        queue.push(PlaylistEvent::TracksChanged { length: 3 });
        queue.push(PlaylistEvent::TrackChanged {
            previous: 1,
            current: 2,
        });

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], PlaylistEvent::TracksChanged { length: 3 });
        assert!(queue.is_empty());
    }

    #[test]
    fn events_serialize_for_ui_bridges() {
        let json = serde_json::to_value(PlaylistEvent::StateChanged {
            state: PlaybackState::Playing,
        })
        .unwrap();
        assert_eq!(json["StateChanged"]["state"], "Playing");
    }
}
