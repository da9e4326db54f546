//! Playlist - core orchestration
//!
//! Owns the track list, the current-track cursor, loop/auto-play settings and
//! the playback device. Every method runs synchronously to completion; the
//! asynchronous parts (play requests, auto-advance timer, device events) are
//! driven by the event loop in `event_loop.rs`.

use crate::{
    auto_advance::AutoAdvance,
    config::PlaylistOptions,
    device::{DeviceError, DeviceEvent, DeviceEvents, PlaybackDevice},
    error::{PlaylistError, Result},
    events::{EventQueue, PlaylistEvent},
    shuffle::fisher_yates,
    track::{Locator, Track, TrackId},
    types::{PlaybackState, TrackInput, TrackRef},
    volume::Volume,
};
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::FutureExt;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Callback fired when the selected track index changes
///
/// Arguments are the playlist, the previous 1-based index and the new 1-based
/// index.
pub type TrackChangedCallback<D> = Box<dyn FnMut(&Playlist<D>, usize, usize) + Send>;

/// Resolved play request, tagged so stale rejections can be told apart
pub(crate) struct PlayOutcome {
    pub seq: u64,
    pub locator: Locator,
    pub result: std::result::Result<(), DeviceError>,
}

/// Ordered tracks bound to a single playback device
///
/// Invariants:
/// - there is always at least one track
/// - the current index is always in bounds
/// - the device always has the current track's media loaded
pub struct Playlist<D> {
    tracks: Vec<Track>,
    current: usize,
    looping: bool,
    options: PlaylistOptions,
    state: PlaybackState,
    device: D,
    track_changed: Option<TrackChangedCallback<D>>,
    events: EventQueue,

    // Driven by the event loop
    pub(crate) device_events: mpsc::UnboundedReceiver<DeviceEvent>,
    pub(crate) device_events_open: bool,
    pub(crate) auto_advance: AutoAdvance,
    pub(crate) play_requests: FuturesUnordered<BoxFuture<'static, PlayOutcome>>,
    play_seq: u64,
}

impl<D: PlaybackDevice> Playlist<D> {
    /// Create a playlist from tracks and/or locators
    ///
    /// Nested lists are flattened. Fails with [`PlaylistError::Validation`] if
    /// no tracks remain, a locator is empty, a track appears twice, or the
    /// configured volume is invalid.
    pub fn new(tracks: impl Into<TrackInput>, device: D, options: PlaylistOptions) -> Result<Self> {
        let tracks = tracks.into().into_tracks();
        if tracks.is_empty() {
            return Err(PlaylistError::Validation(
                "a playlist needs at least one track".to_string(),
            ));
        }
        validate_new_tracks(&[], &tracks)?;

        let (events, device_events) = DeviceEvents::channel();
        let mut playlist = Self {
            tracks,
            current: 0,
            looping: false,
            options,
            state: PlaybackState::Idle,
            device,
            track_changed: None,
            events: EventQueue::default(),
            device_events,
            device_events_open: true,
            auto_advance: AutoAdvance::default(),
            play_requests: FuturesUnordered::new(),
            play_seq: 0,
        };

        playlist.device.subscribe(events);
        playlist.device.set_volume(playlist.options.volume.level());
        playlist.bind_current();

        info!(
            tracks = playlist.tracks.len(),
            auto_play_next = playlist.options.auto_play_next,
            auto_play_delay_ms = playlist.options.auto_play_delay,
            "playlist created"
        );
        Ok(playlist)
    }

    /// Create a playlist with default options
    pub fn with_defaults(tracks: impl Into<TrackInput>, device: D) -> Result<Self> {
        Self::new(tracks, device, PlaylistOptions::default())
    }

    /// Replace the track-changed callback (default: none)
    pub fn on_track_changed<F>(&mut self, callback: F)
    where
        F: FnMut(&Playlist<D>, usize, usize) + Send + 'static,
    {
        self.track_changed = Some(Box::new(callback));
    }

    // ===== Queries =====

    /// Currently selected track
    pub fn track(&self) -> &Track {
        &self.tracks[self.current]
    }

    /// Currently selected track, for metadata edits
    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.tracks[self.current]
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// 0-based index of the current track
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// 1-based position of the current track, as used by `set_track`
    pub fn current_number(&self) -> usize {
        self.current + 1
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.iter().any(|t| t.id() == id)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.device.position()
    }

    /// Duration of the current track, if the device knows it yet
    pub fn track_length(&self) -> Option<f64> {
        self.device.duration()
    }

    pub fn options(&self) -> &PlaylistOptions {
        &self.options
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Direct device access for platform plumbing
    ///
    /// Loading other media through this handle breaks the device/track binding.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ===== Selection =====

    /// Select a track, stopping playback
    ///
    /// `ByCurrent` only rebinds the device to the current track and does not
    /// stop. Emits track-changed when the index actually changes.
    pub fn set_track(&mut self, target: impl Into<TrackRef>) -> Result<()> {
        let target = target.into();
        if target == TrackRef::ByCurrent {
            self.bind_current();
            return Ok(());
        }

        let index = resolve(&self.tracks, self.current, target)?;
        self.stop();
        self.select(index);
        Ok(())
    }

    // ===== Transport =====

    /// Start playback of the current track
    ///
    /// A rejected request is logged and leaves the playlist idle; it is never
    /// returned to the caller.
    pub fn play(&mut self) {
        self.request_playback();
    }

    /// Select a track, then start playback
    ///
    /// Cancels a pending auto-advance, even when the target is the current
    /// track.
    pub fn play_track(&mut self, target: impl Into<TrackRef>) -> Result<()> {
        self.set_track(target)?;
        if self.auto_advance.cancel() {
            debug!("pending auto-advance cancelled");
        }
        self.request_playback();
        Ok(())
    }

    /// Pause without resetting the position
    pub fn pause(&mut self) {
        if self.auto_advance.cancel() {
            debug!("pending auto-advance cancelled");
        }
        self.device.pause();
        self.set_state(PlaybackState::Idle);
    }

    /// Pause and rewind to the start of the track
    pub fn stop(&mut self) {
        self.pause();
        self.device.set_position(0.0);
    }

    /// Advance to the following track (wrapping) and play it
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.stop();
        let index = (self.current + 1) % self.tracks.len();
        self.select(index);
        self.device.set_position(0.0);
        self.request_playback();
    }

    /// Go back to the preceding track (wrapping) and play it
    pub fn prev(&mut self) {
        self.stop();
        let index = match self.current {
            0 => self.tracks.len() - 1,
            i => i - 1,
        };
        self.select(index);
        self.device.set_position(0.0);
        self.request_playback();
    }

    /// Randomly reorder the tracks
    ///
    /// The current index is kept, so the slot now holds whichever track
    /// landed there; the device is rebound to it without a track-changed
    /// notification.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    /// [`Playlist::shuffle`] with a caller-supplied RNG
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.stop();
        let previous = self.track().id();

        fisher_yates(&mut self.tracks, rng);

        if self.track().id() != previous {
            self.bind_current();
        }
        info!(tracks = self.tracks.len(), "playlist shuffled");
        self.events.push(PlaylistEvent::TracksChanged {
            length: self.tracks.len(),
        });
    }

    /// Move the playback position, clamped to `[0, duration]`
    ///
    /// Infinities clamp like any other out-of-range time. With no known
    /// duration, `+inf` leaves the position unchanged.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if seconds.is_nan() {
            return Err(PlaylistError::Validation(
                "seek time must be a number, got NaN".to_string(),
            ));
        }

        let mut target = seconds.max(0.0);
        if let Some(duration) = self.device.duration().filter(|d| d.is_finite()) {
            target = target.min(duration);
        }
        if target.is_infinite() {
            return Ok(());
        }

        self.device.set_position(target);
        Ok(())
    }

    // ===== Volume =====

    /// Set the output volume, in `[0.0, 1.0]`
    pub fn set_volume(&mut self, level: f64) -> Result<()> {
        let volume = Volume::new(level)?;
        self.apply_volume(volume);
        Ok(())
    }

    pub fn volume(&self) -> f64 {
        self.options.volume.level()
    }

    /// Set volume to zero (the previous level is not remembered)
    pub fn mute(&mut self) {
        self.apply_volume(Volume::MUTED);
    }

    // ===== Settings =====

    /// Replay the current track when it ends, ahead of auto-advance
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
        if looping && self.auto_advance.cancel() {
            debug!("pending auto-advance cancelled by looping");
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_auto_play_next(&mut self, enabled: bool) {
        self.options.auto_play_next = enabled;
        if !enabled && self.auto_advance.cancel() {
            debug!("pending auto-advance cancelled");
        }
    }

    pub fn auto_play_next(&self) -> bool {
        self.options.auto_play_next
    }

    /// Delay before auto-advance, in milliseconds
    ///
    /// Applies to the next end of track; an already pending advance keeps its
    /// deadline.
    pub fn set_auto_play_delay(&mut self, delay_ms: u64) {
        self.options.auto_play_delay = delay_ms;
    }

    pub fn auto_play_delay(&self) -> u64 {
        self.options.auto_play_delay
    }

    // ===== Track Management =====

    /// Append tracks and/or locators (nested lists are flattened)
    ///
    /// Everything is validated before anything is appended.
    pub fn add_track(&mut self, input: impl Into<TrackInput>) -> Result<()> {
        let tracks = input.into().into_tracks();
        if tracks.is_empty() {
            return Ok(());
        }
        validate_new_tracks(&self.tracks, &tracks)?;

        let added = tracks.len();
        self.tracks.extend(tracks);
        info!(added, total = self.tracks.len(), "tracks added");
        self.events.push(PlaylistEvent::TracksChanged {
            length: self.tracks.len(),
        });
        Ok(())
    }

    /// Append each item in order
    pub fn add_tracks<I, T>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<TrackInput>,
    {
        self.add_track(TrackInput::List(items.into_iter().map(Into::into).collect()))
    }

    /// Remove one track by 1-based index or by reference
    pub fn remove_track(&mut self, target: impl Into<TrackRef>) -> Result<()> {
        self.remove_tracks([target.into()])
    }

    /// Remove several tracks, applied in order against the shrinking list
    ///
    /// All-or-nothing: if any removal fails, no track is removed. Playback is
    /// stopped once validation succeeds, even when there was nothing to remove. If the current index falls off the
    /// end, the last track is selected.
    pub fn remove_tracks<I, T>(&mut self, targets: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<TrackRef>,
    {
        let mut remaining = self.tracks.clone();
        let mut removed = 0;

        for target in targets {
            let cursor = self.current.min(remaining.len() - 1);
            let index = resolve(&remaining, cursor, target.into())?;
            if remaining.len() == 1 {
                return Err(PlaylistError::Invariant(
                    "a playlist must contain at least one track".to_string(),
                ));
            }
            remaining.remove(index);
            removed += 1;
        }

        self.stop();
        if removed == 0 {
            return Ok(());
        }

        let previous = self.track().id();
        self.tracks = remaining;
        info!(removed, total = self.tracks.len(), "tracks removed");
        self.events.push(PlaylistEvent::TracksChanged {
            length: self.tracks.len(),
        });

        if self.current >= self.tracks.len() {
            self.select(self.tracks.len() - 1);
        } else if self.track().id() != previous {
            self.bind_current();
        }
        Ok(())
    }

    // ===== End of Media =====

    /// React to the device reaching the end of the current track
    ///
    /// Looping replays immediately and takes precedence over auto-advance.
    /// Otherwise, with auto-play enabled, `next()` is scheduled after the
    /// configured delay.
    pub fn handle_media_ended(&mut self) {
        if self.looping {
            debug!(track = %self.track().locator(), "track ended, looping");
            self.device.set_position(0.0);
            self.request_playback();
            return;
        }

        self.set_state(PlaybackState::Idle);

        if self.options.auto_play_next {
            let delay = self.options.auto_play_delay_duration();
            self.auto_advance.schedule(Instant::now(), delay);
            debug!(
                track = %self.track().locator(),
                delay_ms = self.options.auto_play_delay,
                "track ended, auto-advance scheduled"
            );
            self.events.push(PlaylistEvent::AutoAdvanceScheduled {
                delay_ms: self.options.auto_play_delay,
            });
        } else {
            debug!(track = %self.track().locator(), "track ended");
        }
    }

    /// Run a pending auto-advance if its deadline has passed
    ///
    /// For hosts that drive their own timers instead of the event loop.
    pub fn poll_auto_advance(&mut self, now: Instant) -> bool {
        if !self.auto_advance.take_due(now) {
            return false;
        }
        debug!("auto-advancing");
        self.next();
        true
    }

    /// Deadline of the pending auto-advance, if any
    pub fn pending_auto_advance(&self) -> Option<Instant> {
        self.auto_advance.deadline()
    }

    // ===== Events =====

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<PlaylistEvent> {
        self.events.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // ===== Internal =====

    /// Update the cursor, notify, and load the new track
    fn select(&mut self, index: usize) {
        let previous = self.current;
        self.current = index;
        if previous != index {
            self.emit_track_changed(previous, index);
        }
        self.bind_current();
    }

    fn bind_current(&mut self) {
        let locator = self.tracks[self.current].locator().clone();
        debug!(index = self.current + 1, track = %locator, "binding device");
        self.device.load(&locator);

        // Queued end-of-media events belong to the media just replaced
        let mut stale = 0;
        while self.device_events.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!(stale, "dropped end-of-media events for previous media");
        }
    }

    fn emit_track_changed(&mut self, previous: usize, current: usize) {
        let (previous, current) = (previous + 1, current + 1);
        debug!(previous, current, "track changed");
        self.events
            .push(PlaylistEvent::TrackChanged { previous, current });

        if let Some(mut callback) = self.track_changed.take() {
            callback(self, previous, current);
            self.track_changed = Some(callback);
        }
    }

    fn request_playback(&mut self) {
        self.device.set_volume(self.options.volume.level());
        let request = self.device.play();

        self.play_seq += 1;
        let seq = self.play_seq;
        let locator = self.track().locator().clone();
        self.play_requests.push(
            async move {
                PlayOutcome {
                    seq,
                    locator,
                    result: request.await,
                }
            }
            .boxed(),
        );

        self.set_state(PlaybackState::Playing);
    }

    /// Handle a resolved play request
    pub(crate) fn settle_play(&mut self, outcome: PlayOutcome) {
        match outcome.result {
            Ok(()) => debug!(track = %outcome.locator, "playback started"),
            Err(err) => {
                warn!(track = %outcome.locator, error = %err, "playback request rejected");
                self.events.push(PlaylistEvent::PlaybackRejected {
                    locator: outcome.locator.to_string(),
                    message: err.to_string(),
                });
                // A later request supersedes this one
                if outcome.seq == self.play_seq {
                    self.set_state(PlaybackState::Idle);
                }
            }
        }
    }

    fn apply_volume(&mut self, volume: Volume) {
        self.options.volume = volume;
        self.device.set_volume(volume.level());
        self.events.push(PlaylistEvent::VolumeChanged {
            level: volume.level(),
        });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.events.push(PlaylistEvent::StateChanged { state });
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Playlist<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playlist")
            .field("tracks", &self.tracks)
            .field("current", &self.current)
            .field("looping", &self.looping)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// Resolve a target to a 0-based index in `tracks`
fn resolve(tracks: &[Track], current: usize, target: TrackRef) -> Result<usize> {
    match target {
        TrackRef::ByIndex(number) => {
            if number < 1 || number > tracks.len() {
                return Err(PlaylistError::Range {
                    index: number,
                    len: tracks.len(),
                });
            }
            Ok(number - 1)
        }
        TrackRef::ByReference(id) => tracks
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| PlaylistError::NotFound(format!("track {id} is not in this playlist"))),
        TrackRef::ByCurrent => Ok(current),
    }
}

/// Reject empty locators and identities already present
fn validate_new_tracks(existing: &[Track], incoming: &[Track]) -> Result<()> {
    let mut seen: HashSet<TrackId> = existing.iter().map(Track::id).collect();

    for track in incoming {
        if track.locator().is_empty() {
            return Err(PlaylistError::Validation(
                "track locator must not be empty".to_string(),
            ));
        }
        if !seen.insert(track.id()) {
            return Err(PlaylistError::Validation(format!(
                "track \"{}\" ({}) is already in this playlist",
                track.name(),
                track.id()
            )));
        }
    }
    Ok(())
}
