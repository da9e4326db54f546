//! Playback device capability
//!
//! The playlist never decodes or outputs audio itself. It drives a device that
//! wraps whatever the platform provides (an HTML audio element, a native media
//! player, a cpal stream) through this trait.

use crate::track::Locator;
use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc;

/// Outcome of a playback request, resolved by the device
pub type PlayRequest = BoxFuture<'static, Result<(), DeviceError>>;

/// Reasons a device refuses or aborts playback
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Blocked by platform policy (e.g. autoplay without a user gesture)
    #[error("Playback not allowed: {0}")]
    NotAllowed(String),

    /// Media could not be loaded or decoded
    #[error("Unsupported media: {0}")]
    Unsupported(String),

    /// Request superseded by a later load or pause
    #[error("Playback aborted: {0}")]
    Aborted(String),
}

/// Notifications a device sends back to its playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The loaded media played through to its end
    Ended,
}

/// Sending half of the device event channel, handed to the device once
#[derive(Debug, Clone)]
pub struct DeviceEvents {
    tx: mpsc::UnboundedSender<DeviceEvent>,
}

impl DeviceEvents {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<DeviceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report end of media
    ///
    /// Returns false if the playlist has been dropped.
    pub fn notify_ended(&self) -> bool {
        self.tx.send(DeviceEvent::Ended).is_ok()
    }
}

/// Platform media output driven by a playlist
///
/// Times are in seconds, volume is linear in `[0.0, 1.0]`.
pub trait PlaybackDevice: Send {
    /// Register the end-of-media channel
    ///
    /// Called exactly once, when the playlist takes ownership of the device.
    fn subscribe(&mut self, events: DeviceEvents);

    /// Replace the loaded media
    fn load(&mut self, locator: &Locator);

    /// Request playback of the loaded media
    ///
    /// The request may be rejected asynchronously (platform autoplay policy,
    /// unsupported media). The playlist logs rejections and never surfaces them.
    fn play(&mut self) -> PlayRequest;

    /// Pause without resetting the position
    fn pause(&mut self);

    /// Current playback position
    fn position(&self) -> f64;

    /// Move the playback position
    fn set_position(&mut self, seconds: f64);

    /// Length of the loaded media, if known yet
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, level: f64);
}

/// In-memory device for unit tests
///
/// Records every call so tests can assert on what the playlist asked for.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockDevice {
    pub events: Option<DeviceEvents>,
    pub subscribe_count: usize,
    pub loaded: Option<Locator>,
    pub load_history: Vec<Locator>,
    pub play_count: usize,
    pub pause_count: usize,
    pub paused: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub reject_next_play: Option<DeviceError>,
}

#[cfg(test)]
impl MockDevice {
    pub fn with_duration(seconds: f64) -> Self {
        Self {
            duration: Some(seconds),
            paused: true,
            volume: 1.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl PlaybackDevice for MockDevice {
    fn subscribe(&mut self, events: DeviceEvents) {
        self.events = Some(events);
        self.subscribe_count += 1;
    }

    fn load(&mut self, locator: &Locator) {
        self.loaded = Some(locator.clone());
        self.load_history.push(locator.clone());
        self.position = 0.0;
    }

    fn play(&mut self) -> PlayRequest {
        use futures_util::FutureExt;

        self.play_count += 1;
        let outcome = match self.reject_next_play.take() {
            Some(err) => Err(err),
            None => {
                self.paused = false;
                Ok(())
            }
        };
        futures_util::future::ready(outcome).boxed()
    }

    fn pause(&mut self) {
        self.pause_count += 1;
        self.paused = true;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, level: f64) {
        self.volume = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ended_notification_reaches_receiver() {
        let (events, mut rx) = DeviceEvents::channel();
        assert!(events.notify_ended());
        assert_eq!(rx.try_recv().unwrap(), DeviceEvent::Ended);
    }

    #[test]
    fn notify_after_receiver_dropped_reports_false() {
        let (events, rx) = DeviceEvents::channel();
        drop(rx);
        assert!(!events.notify_ended());
    }
}
