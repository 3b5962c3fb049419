//! Pause-gate and volume stage wrapped around the decoded stream.
//!
//! Both read their flags from the shared [`Transport`], so pausing or
//! changing volume never touches the decoder.

use std::sync::Arc;

use super::stream::TrackStream;
use super::types::Transport;

/// Emits silence while paused, without pulling from the inner stream.
pub struct PauseGate<S> {
    inner: S,
    transport: Arc<Transport>,
}

impl<S> PauseGate<S> {
    pub fn new(inner: S, transport: Arc<Transport>) -> Self {
        Self { inner, transport }
    }

    pub(crate) fn inner(&self) -> &S {
        &self.inner
    }

    pub(crate) fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: Iterator<Item = f32>> Iterator for PauseGate<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.transport.is_paused() {
            return Some(0.0);
        }
        self.inner.next()
    }
}

/// Scales samples by the transport amplitude, or zeroes them when muted.
pub struct VolumeStage<S> {
    inner: S,
    transport: Arc<Transport>,
}

impl<S> VolumeStage<S> {
    pub fn new(inner: S, transport: Arc<Transport>) -> Self {
        Self { inner, transport }
    }

    pub(crate) fn inner(&self) -> &S {
        &self.inner
    }

    pub(crate) fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: Iterator<Item = f32>> Iterator for VolumeStage<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        if self.transport.is_muted() {
            Some(0.0)
        } else {
            Some(sample * self.transport.amplitude())
        }
    }
}

/// What gets attached to the output device: stream, then gate, then volume.
pub type Chain = VolumeStage<PauseGate<TrackStream>>;

pub fn compose(stream: TrackStream, transport: Arc<Transport>) -> Chain {
    VolumeStage::new(PauseGate::new(stream, transport.clone()), transport)
}

impl Chain {
    pub fn stream(&self) -> &TrackStream {
        self.inner().inner()
    }

    pub fn stream_mut(&mut self) -> &mut TrackStream {
        self.inner_mut().inner_mut()
    }
}
