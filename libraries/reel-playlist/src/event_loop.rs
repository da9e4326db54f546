//! Async event loop for a playlist
//!
//! Waits on the three things that happen outside a method call:
//! - a play request resolving (rejections are logged, never raised)
//! - the pending auto-advance deadline
//! - the device reporting end of media
//!
//! Everything runs on the caller's task; nothing is spawned.

use crate::device::{DeviceEvent, PlaybackDevice};
use crate::playlist::Playlist;
use futures_util::StreamExt;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

impl<D: PlaybackDevice> Playlist<D> {
    /// Handle one pending event
    ///
    /// Returns false without waiting when there is nothing left to wait for:
    /// no play request in flight, no auto-advance pending, and the device has
    /// dropped its end-of-media channel.
    pub async fn tick(&mut self) -> bool {
        let has_requests = !self.play_requests.is_empty();
        let deadline = self.auto_advance.deadline();
        let listening = self.device_events_open;

        if !has_requests && deadline.is_none() && !listening {
            return false;
        }

        // Only polled when a deadline exists
        let wake_at = deadline.unwrap_or_else(Instant::now);

        tokio::select! {
            biased;

            Some(outcome) = self.play_requests.next(), if has_requests => {
                self.settle_play(outcome);
            }
            event = self.device_events.recv(), if listening => match event {
                Some(DeviceEvent::Ended) => self.handle_media_ended(),
                None => {
                    debug!("device event channel closed");
                    self.device_events_open = false;
                }
            },
            () = sleep_until(wake_at), if deadline.is_some() => {
                self.poll_auto_advance(Instant::now());
            }
            else => return false,
        }

        true
    }

    /// Process events until nothing is left to wait for
    ///
    /// While the device holds its end-of-media channel this keeps running;
    /// drop the device's `DeviceEvents` (or the future) to stop.
    pub async fn run(&mut self) {
        while self.tick().await {}
    }

    /// Settle every play request that has already resolved
    ///
    /// Does not wait on requests that are still pending.
    pub fn settle_ready_requests(&mut self) {
        use futures_util::FutureExt;

        while let Some(Some(outcome)) = self.play_requests.next().now_or_never() {
            self.settle_play(outcome);
        }
    }
}
