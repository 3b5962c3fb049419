//! The output device and the render side that pulls from it.
//!
//! One [`Chain`] at most is installed at a time. The render side pulls
//! samples through a [`RenderTap`] which locks the same slot the engine
//! locks for seek and position reads, so neither ever observes the other
//! mid-operation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{OutputStreamBuilder, Source};
use tracing::{debug, error};

use crate::error::DeviceError;

use super::stages::Chain;
use super::stream::TrackStream;
use super::types::{StreamFormat, lock};

/// Render pulls happen in chunks of this many milliseconds.
const CHUNK_MS: u32 = 10;

struct Slot {
    generation: u64,
    installed: Option<Chain>,
}

/// Starts pulling from a freshly attached tap.
pub trait RenderBackend: Send {
    fn start(&mut self, tap: RenderTap) -> Result<(), DeviceError>;
}

/// Owns the attached composition and the backend that renders it.
pub struct OutputDevice {
    slot: Arc<Mutex<Slot>>,
    backend: Mutex<Box<dyn RenderBackend>>,
}

impl OutputDevice {
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                installed: None,
            })),
            backend: Mutex::new(Box::new(backend)),
        }
    }

    /// Exclusive access to the installed stream. Rendering blocks while
    /// the guard is held.
    pub fn lock(&self) -> DeviceGuard<'_> {
        DeviceGuard {
            slot: lock(&self.slot),
        }
    }

    /// Install `chain` and hand a tap for it to the backend.
    ///
    /// Anything still installed is dropped first. If the backend fails to
    /// start, the device is left empty.
    pub fn attach(&self, chain: Chain) -> Result<(), DeviceError> {
        let format = chain.stream().format();
        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.installed = Some(chain);
            slot.generation
        };

        let tap = RenderTap::new(self.slot.clone(), generation, format);
        let started = lock(&self.backend).start(tap);
        if let Err(err) = started {
            error!(error = %err, "output backend refused stream");
            self.detach();
            return Err(err);
        }
        Ok(())
    }

    /// Drop the installed chain, closing its file. Taps handed out for it
    /// stop producing samples. Returns whether anything was installed.
    pub fn detach(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.installed.take().is_some()
    }
}

pub struct DeviceGuard<'a> {
    slot: MutexGuard<'a, Slot>,
}

impl DeviceGuard<'_> {
    pub fn stream(&self) -> Option<&TrackStream> {
        self.slot.installed.as_ref().map(Chain::stream)
    }

    pub fn stream_mut(&mut self) -> Option<&mut TrackStream> {
        self.slot.installed.as_mut().map(Chain::stream_mut)
    }
}

/// Pull side of one attachment.
///
/// Yields the installed chain's samples, then silence once the track has
/// run out, and ends when the chain is detached or replaced.
pub struct RenderTap {
    slot: Arc<Mutex<Slot>>,
    generation: u64,
    format: StreamFormat,
    chunk_len: usize,
    chunk: Vec<f32>,
    cursor: usize,
}

impl RenderTap {
    fn new(slot: Arc<Mutex<Slot>>, generation: u64, format: StreamFormat) -> Self {
        let frames = (format.sample_rate * CHUNK_MS / 1000).max(1) as usize;
        let len = frames * usize::from(format.channels.max(1));
        Self {
            slot,
            generation,
            format,
            chunk_len: len,
            chunk: Vec::with_capacity(len),
            cursor: 0,
        }
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Samples pulled from the chain per lock acquisition.
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    fn refill(&mut self) -> bool {
        let len = self.chunk_len;
        let mut slot = lock(&self.slot);
        if slot.generation != self.generation {
            return false;
        }
        let Some(chain) = slot.installed.as_mut() else {
            return false;
        };
        self.chunk.clear();
        self.chunk.extend((0..len).map(|_| chain.next().unwrap_or(0.0)));
        self.cursor = 0;
        true
    }
}

impl Iterator for RenderTap {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.cursor >= self.chunk.len() && !self.refill() {
            return None;
        }
        let sample = self.chunk[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for RenderTap {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.format.channels
    }

    fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Renders to the default system output through rodio.
///
/// The output stream is opened on first use, on a thread of its own that
/// lives until the backend is dropped.
#[derive(Default)]
pub struct RodioBackend {
    output: Option<OutputThread>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for RodioBackend {
    fn start(&mut self, tap: RenderTap) -> Result<(), DeviceError> {
        if self.output.is_none() {
            self.output = Some(OutputThread::spawn()?);
        }
        match self.output.as_ref() {
            Some(output) => {
                output.mixer.add(tap);
                Ok(())
            }
            None => Err(DeviceError::Closed),
        }
    }
}

struct OutputThread {
    mixer: Mixer,
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl OutputThread {
    fn spawn() -> Result<Self, DeviceError> {
        let (mixer_tx, mixer_rx) = mpsc::sync_channel::<Result<Mixer, DeviceError>>(1);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("turntable-output".into())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(err) => {
                        let _ = mixer_tx.send(Err(DeviceError::Open(err.to_string())));
                        return;
                    }
                };
                // rodio prints to stderr when the stream drops, which garbles the TUI.
                stream.log_on_drop(false);
                if mixer_tx.send(Ok(stream.mixer().clone())).is_err() {
                    return;
                }
                // Hold the stream open until the sender side goes away.
                let _ = shutdown_rx.recv();
                debug!("output thread exiting");
            })
            .map_err(|err| DeviceError::Open(err.to_string()))?;

        let mixer = mixer_rx.recv().map_err(|_| DeviceError::Closed)??;
        debug!("output stream opened");
        Ok(Self {
            mixer,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for OutputThread {
    fn drop(&mut self) {
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Keeps taps for the caller to pull by hand. Used where no sound card
/// is wanted, such as tests.
#[derive(Clone, Default)]
pub struct ManualBackend {
    taps: Arc<Mutex<Vec<RenderTap>>>,
    started: Arc<AtomicUsize>,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently started tap, if it has not been taken yet.
    pub fn take_latest(&self) -> Option<RenderTap> {
        lock(&self.taps).pop()
    }

    /// How many taps have been started in total.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::Acquire)
    }
}

impl RenderBackend for ManualBackend {
    fn start(&mut self, tap: RenderTap) -> Result<(), DeviceError> {
        lock(&self.taps).push(tap);
        self.started.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
