//! Reel - Playlist Management
//!
//! Platform-agnostic playlist controller for Reel.
//!
//! This crate provides:
//! - Ordered track list with a current-track cursor (1-based addressing)
//! - Transport control (play, pause, stop, next/prev with wraparound, seek)
//! - Looping and delayed auto-advance on end of media
//! - Volume validation and mirroring onto the device
//! - Fisher-Yates shuffle
//! - Track-changed callback and an event queue for UI synchronization
//! - Options from JSON overrides, config files, and environment
//!
//! # Architecture
//!
//! `reel-playlist` does not decode or output audio. The platform provides a
//! [`PlaybackDevice`] (an HTML audio element, a native media player, ...)
//! and the playlist drives it. All playlist methods are synchronous; the
//! asynchronous pieces (play requests, auto-advance delay, end-of-media
//! events) are handled by [`Playlist::tick`] / [`Playlist::run`].
//!
//! # Example: Basic Playback
//!
//! ```rust,no_run
//! use reel_playlist::{Playlist, PlaylistOptions, PlaybackDevice, TrackRef};
//! # use reel_playlist::{DeviceError, DeviceEvents, Locator, PlayRequest};
//! # struct Speaker;
//! # impl PlaybackDevice for Speaker {
//! #     fn subscribe(&mut self, _: DeviceEvents) {}
//! #     fn load(&mut self, _: &Locator) {}
//! #     fn play(&mut self) -> PlayRequest { Box::pin(async { Ok::<(), DeviceError>(()) }) }
//! #     fn pause(&mut self) {}
//! #     fn position(&self) -> f64 { 0.0 }
//! #     fn set_position(&mut self, _: f64) {}
//! #     fn duration(&self) -> Option<f64> { None }
//! #     fn volume(&self) -> f64 { 1.0 }
//! #     fn set_volume(&mut self, _: f64) {}
//! # }
//!
//! # async fn demo() -> reel_playlist::Result<()> {
//! let mut playlist = Playlist::new(
//!     vec!["/music/one.mp3", "/music/two.mp3", "/music/three.mp3"],
//!     Speaker,
//!     PlaylistOptions::default(),
//! )?;
//!
//! playlist.on_track_changed(|_, previous, current| {
//!     println!("track {previous} -> {current}");
//! });
//!
//! playlist.set_volume(0.8)?;
//! playlist.play_track(TrackRef::ByIndex(2))?;
//! playlist.next();
//!
//! // Handle end of media, auto-advance, and play-request outcomes
//! playlist.run().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Options
//!
//! ```rust
//! use reel_playlist::PlaylistOptions;
//! use serde_json::json;
//!
//! let options = PlaylistOptions::from_overrides(json!({
//!     "autoPlayNext": true,
//!     "autoPlayDelay": 1500,
//! }))
//! .unwrap();
//!
//! assert_eq!(options.auto_play_delay, 1500);
//! assert_eq!(options.volume.level(), 1.0);
//! ```

mod auto_advance;
mod config;
mod device;
mod error;
mod event_loop;
mod events;
pub mod merge;
mod playlist;
pub mod shuffle;
mod track;
pub mod types;
mod volume;

// Public exports
pub use config::{PlaylistOptions, DEFAULT_AUTO_PLAY_DELAY_MS, ENV_PREFIX};
pub use device::{DeviceError, DeviceEvent, DeviceEvents, PlayRequest, PlaybackDevice};
pub use error::{PlaylistError, Result};
pub use events::PlaylistEvent;
pub use playlist::{Playlist, TrackChangedCallback};
pub use track::{Locator, Track, TrackId, TrackMetadata};
pub use types::{PlaybackState, TrackInput, TrackRef};
pub use volume::Volume;
