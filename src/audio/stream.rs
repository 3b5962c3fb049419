//! The decoded sample stream owned by a track session.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rodio::{Decoder, Source};
use tracing::debug;

use super::types::StreamFormat;

pub type FileDecoder = Decoder<BufReader<File>>;

/// Counts decoder streams that are still alive.
#[derive(Debug, Clone, Default)]
pub struct StreamCounter(Arc<AtomicUsize>);

impl StreamCounter {
    pub fn acquire(&self) -> StreamGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        StreamGuard(self.0.clone())
    }

    pub fn live(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct StreamGuard(Arc<AtomicUsize>);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Interleaved `f32` samples from one file, with frame counters.
///
/// Dropping the stream drops the decoder and closes the file.
pub struct TrackStream {
    decoder: FileDecoder,
    format: StreamFormat,
    len: u64,
    samples_read: u64,
    drained: bool,
    _guard: StreamGuard,
}

impl TrackStream {
    pub(crate) fn new(
        decoder: FileDecoder,
        format: StreamFormat,
        len: u64,
        guard: StreamGuard,
    ) -> Self {
        Self {
            decoder,
            format,
            len,
            samples_read: 0,
            drained: false,
            _guard: guard,
        }
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Total length in frames.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Frames handed out so far (or the last seek target).
    pub fn frame_position(&self) -> u64 {
        self.samples_read / u64::from(self.format.channels.max(1))
    }

    /// Move to an absolute frame. Callers bound-check against `len()`.
    pub fn seek(&mut self, frame: u64) -> Result<(), rodio::source::SeekError> {
        let channels = u64::from(self.format.channels.max(1));

        // Decoders disagree about seeking onto the final frame; treat it as
        // running out of samples.
        if frame >= self.len {
            self.samples_read = self.len * channels;
            self.drained = true;
            return Ok(());
        }

        let at = Duration::from_secs_f64(self.format.frames_to_seconds(frame));
        self.decoder.try_seek(at)?;
        self.samples_read = frame * channels;
        self.drained = false;
        Ok(())
    }
}

impl Iterator for TrackStream {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.drained {
            return None;
        }
        match self.decoder.next() {
            Some(sample) => {
                self.samples_read += 1;
                Some(sample)
            }
            None => {
                self.drained = true;
                let end = self.frame_position();
                if end != self.len {
                    debug!(estimated = self.len, actual = end, "correcting stream length");
                    self.len = end;
                }
                None
            }
        }
    }
}
