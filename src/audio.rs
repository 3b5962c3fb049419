//! Audio playback: codec selection, the decoded stream, the pause and
//! volume stages, the output device and the engine that ties them together.
//!
//! [`PlaybackEngine`] is the entry point. It holds at most one loaded track
//! and drives a single [`OutputDevice`].

mod decoder;
mod device;
mod player;
mod stages;
mod stream;
mod types;

pub use decoder::Codec;
pub use device::{DeviceGuard, ManualBackend, OutputDevice, RenderBackend, RenderTap, RodioBackend};
pub use player::PlaybackEngine;
pub use stages::{Chain, PauseGate, VolumeStage, compose};
pub use stream::{StreamCounter, TrackStream};
pub use types::{PlaybackSnapshot, SILENCE_THRESHOLD, StreamFormat, Transport, VOLUME_BASE};

pub(crate) use types::lock;

#[cfg(test)]
mod tests;
