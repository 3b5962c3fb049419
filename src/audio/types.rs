//! Audio-related small types and handles.
//!
//! This module defines the stream format descriptor, the transport flags
//! shared between the engine and the render side, and the snapshot type
//! returned to the UI.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::metadata::Metadata;

/// Gains at or below this value mute the output instead of attenuating it.
pub const SILENCE_THRESHOLD: f64 = -5.0;

/// The volume stage multiplies samples by `VOLUME_BASE.powf(gain)`.
pub const VOLUME_BASE: f64 = 2.0;

/// Sample rate and channel layout of a decoded stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl StreamFormat {
    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate as f64
    }

    /// Truncates toward zero. `None` for NaN or infinite input.
    pub fn seconds_to_frame(&self, seconds: f64) -> Option<i64> {
        seconds
            .is_finite()
            .then(|| (seconds * self.sample_rate as f64) as i64)
    }
}

/// Pause, mute and gain for the active track.
///
/// Written by the engine, read by the pause-gate and volume stage on the
/// render thread. Every field is atomic so neither side needs the device lock.
#[derive(Debug)]
pub struct Transport {
    paused: AtomicBool,
    muted: AtomicBool,
    gain: AtomicU64,
    amplitude: AtomicU32,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            paused: AtomicBool::new(false),
            muted: AtomicBool::new(false),
            gain: AtomicU64::new(0f64.to_bits()),
            amplitude: AtomicU32::new(1f32.to_bits()),
        }
    }
}

impl Transport {
    /// Flip the pause flag and return the new value.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Gains above [`SILENCE_THRESHOLD`] unmute and take effect; anything
    /// else mutes and leaves the stored gain untouched.
    pub fn set_volume(&self, gain: f64) {
        if gain > SILENCE_THRESHOLD {
            let amplitude = VOLUME_BASE.powf(gain) as f32;
            self.gain.store(gain.to_bits(), Ordering::Relaxed);
            self.amplitude.store(amplitude.to_bits(), Ordering::Relaxed);
            self.muted.store(false, Ordering::Release);
        } else {
            self.muted.store(true, Ordering::Release);
        }
    }

    pub fn gain(&self) -> f64 {
        f64::from_bits(self.gain.load(Ordering::Relaxed))
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }

    pub fn amplitude(&self) -> f32 {
        f32::from_bits(self.amplitude.load(Ordering::Relaxed))
    }
}

/// Everything the UI shows about the loaded track, read in one go.
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub file_path: String,
    pub metadata: Metadata,
    pub position: f64,
    pub duration: f64,
    pub playing: bool,
    pub gain: f64,
    pub muted: bool,
}

/// Lock a mutex, recovering the data if another thread panicked with it held.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
