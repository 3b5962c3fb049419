use super::*;
use crate::error::{PlayError, SeekError, StreamError};
use crate::test_support::{Tags, tag_file, write_short_wav, write_wav};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tempfile::{TempDir, tempdir};

fn engine() -> (PlaybackEngine, ManualBackend) {
    let backend = ManualBackend::new();
    (PlaybackEngine::new(backend.clone()), backend)
}

fn wav(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    write_short_wav(&path);
    path
}

fn pull_chunk(tap: &mut RenderTap) -> Vec<f32> {
    let n = tap.chunk_len();
    tap.by_ref().take(n).collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn path_str(p: &Path) -> String {
    p.display().to_string()
}

#[test]
fn pause_gate_emits_silence_without_consuming() {
    let transport = Arc::new(Transport::default());
    let mut gate = PauseGate::new(vec![0.5f32, 0.25].into_iter(), transport.clone());

    assert!(transport.toggle_pause());
    assert_eq!(gate.next(), Some(0.0));
    assert_eq!(gate.next(), Some(0.0));

    assert!(!transport.toggle_pause());
    assert_eq!(gate.next(), Some(0.5));
    assert_eq!(gate.next(), Some(0.25));
    assert_eq!(gate.next(), None);
}

#[test]
fn volume_stage_scales_and_mutes() {
    let transport = Arc::new(Transport::default());
    let mut stage = VolumeStage::new(vec![0.5f32, 0.5, 0.5].into_iter(), transport.clone());

    assert_eq!(stage.next(), Some(0.5));
    transport.set_volume(-1.0);
    assert_eq!(stage.next(), Some(0.25));
    transport.set_volume(SILENCE_THRESHOLD);
    assert_eq!(stage.next(), Some(0.0));
    assert_eq!(transport.gain(), -1.0);
    assert_eq!(stage.next(), None);
}

#[test]
fn codec_is_chosen_by_lowercased_extension() {
    assert_eq!(Codec::from_extension("MP3"), Some(Codec::Mp3));
    assert_eq!(Codec::from_extension("Flac"), Some(Codec::Flac));
    assert_eq!(Codec::from_extension("wav"), Some(Codec::Wav));
    assert_eq!(Codec::from_extension("ogg"), Some(Codec::Ogg));
    assert_eq!(Codec::from_extension("m4a"), None);
    assert!(matches!(
        Codec::from_path(Path::new("/music/noext")),
        Err(PlayError::UnsupportedFormat { extension }) if extension.is_empty()
    ));
}

#[test]
fn play_loads_track_and_starts_rendering() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "one.wav");
    let (engine, backend) = engine();

    engine.play(&path).unwrap();

    assert!(engine.is_playing());
    assert_eq!(engine.file_path(), path_str(&path));
    assert!(approx(engine.duration().unwrap(), 1.0));
    assert!(approx(engine.position().unwrap(), 0.0));
    assert_eq!(engine.metadata().title(), "one.wav");
    assert_eq!(engine.volume(), Some(0.0));
    assert!(!engine.is_muted());
    assert_eq!(backend.started(), 1);
    assert_eq!(engine.live_streams(), 1);

    let tap = backend.take_latest().unwrap();
    assert_eq!(
        tap.format(),
        StreamFormat {
            sample_rate: 8_000,
            channels: 2
        }
    );
    assert_eq!(tap.chunk_len(), 160);
}

#[test]
fn unsupported_extension_leaves_engine_idle() {
    let dir = tempdir().unwrap();
    let loaded = wav(&dir, "loaded.wav");
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "not audio").unwrap();
    let (engine, _backend) = engine();

    engine.play(&loaded).unwrap();
    let err = engine.play(&notes).unwrap_err();

    assert!(matches!(err, PlayError::UnsupportedFormat { ref extension } if extension == "txt"));
    assert_eq!(engine.file_path(), "");
    assert!(!engine.is_playing());
    assert_eq!(engine.position(), Err(StreamError::NoActiveStream));
    assert_eq!(engine.live_streams(), 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let (engine, backend) = engine();

    let err = engine.play(dir.path().join("gone.wav")).unwrap_err();

    assert!(matches!(err, PlayError::Io { .. }), "{err:?}");
    assert_eq!(engine.file_path(), "");
    assert_eq!(backend.started(), 0);
}

#[test]
fn corrupt_file_is_a_decode_error_for_every_codec() {
    let dir = tempdir().unwrap();
    let (engine, backend) = engine();

    for codec in Codec::ALL {
        let path = dir.path().join(format!("broken.{}", codec.extension()));
        fs::write(&path, "this is plain text and no codec will take it".repeat(8)).unwrap();

        let err = engine.play(&path).unwrap_err();
        assert!(matches!(err, PlayError::Decode { .. }), "{codec:?}: {err:?}");
        assert_eq!(engine.file_path(), "");
        assert_eq!(engine.live_streams(), 0);
    }
    assert_eq!(backend.started(), 0);
}

#[test]
fn replacing_a_track_releases_the_previous_stream() {
    let dir = tempdir().unwrap();
    let a = wav(&dir, "a.wav");
    let b = wav(&dir, "b.wav");
    let (engine, backend) = engine();

    engine.play(&a).unwrap();
    let mut tap_a = backend.take_latest().unwrap();
    assert!(!pull_chunk(&mut tap_a).is_empty());

    engine.play(&b).unwrap();
    assert_eq!(engine.file_path(), path_str(&b));
    assert_eq!(engine.live_streams(), 1);
    assert_eq!(tap_a.next(), None);

    let mut tap_b = backend.take_latest().unwrap();
    assert_eq!(pull_chunk(&mut tap_b).len(), tap_b.chunk_len());

    for i in 0..20 {
        let next = if i % 2 == 0 { &a } else { &b };
        engine.play(next).unwrap();
        assert_eq!(engine.live_streams(), 1);
    }

    assert!(engine.stop());
    assert_eq!(engine.live_streams(), 0);
}

#[test]
fn pause_toggles_playing_state() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "p.wav");
    let (engine, _backend) = engine();
    engine.play(&path).unwrap();

    engine.pause();
    assert!(!engine.is_playing());
    engine.pause();
    assert!(engine.is_playing());
}

#[test]
fn seek_accepts_zero_through_duration_only() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "s.wav");
    let (engine, _backend) = engine();
    engine.play(&path).unwrap();
    let duration = engine.duration().unwrap();

    assert!(matches!(
        engine.seek(-1.0),
        Err(SeekError::OutOfBounds { .. })
    ));
    assert!(matches!(
        engine.seek(duration + 1.0),
        Err(SeekError::OutOfBounds { .. })
    ));
    assert!(matches!(
        engine.seek(f64::NAN),
        Err(SeekError::OutOfBounds { .. })
    ));

    engine.seek(0.5).unwrap();
    assert!(approx(engine.position().unwrap(), 0.5));

    engine.seek(0.0).unwrap();
    assert!(approx(engine.position().unwrap(), 0.0));

    engine.seek(duration).unwrap();
    assert!(approx(engine.position().unwrap(), duration));
}

#[test]
fn seek_moves_render_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mono.wav");
    write_wav(&path, 8_000, 1, 8_000);
    let (engine, backend) = engine();
    engine.play(&path).unwrap();
    let mut tap = backend.take_latest().unwrap();

    let start = pull_chunk(&mut tap)[0];
    engine.seek(0.05).unwrap();
    let after = pull_chunk(&mut tap)[0];

    // Frame 400 carries 1400 against 1000 at frame 0.
    assert!(((after / start) as f64 - 1.4).abs() < 5e-3, "{start} {after}");
    assert!(approx(engine.position().unwrap(), 0.06));
}

#[test]
fn volume_threshold_mutes_and_unmutes() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "v.wav");
    let (engine, backend) = engine();
    engine.play(&path).unwrap();
    let mut tap = backend.take_latest().unwrap();

    let v0 = pull_chunk(&mut tap)[0] as f64;
    assert!(v0 > 0.0);

    engine.set_volume(-4.99);
    assert_eq!(engine.volume(), Some(-4.99));
    assert!(!engine.is_muted());
    let quiet = pull_chunk(&mut tap)[0] as f64;
    let expected = v0 * 1.08 * VOLUME_BASE.powf(-4.99);
    assert!((quiet - expected).abs() < expected * 1e-3, "{quiet} vs {expected}");

    engine.set_volume(-5.0);
    assert!(engine.is_muted());
    assert_eq!(engine.volume(), Some(-4.99));
    assert!(pull_chunk(&mut tap).iter().all(|s| *s == 0.0));

    engine.set_volume(-12.0);
    assert!(engine.is_muted());
    assert_eq!(engine.volume(), Some(-4.99));

    engine.set_volume(-4.99);
    assert!(!engine.is_muted());
    assert!(pull_chunk(&mut tap).iter().any(|s| *s != 0.0));
}

#[test]
fn paused_output_is_silent_and_holds_position() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "hold.wav");
    let (engine, backend) = engine();
    engine.play(&path).unwrap();
    let mut tap = backend.take_latest().unwrap();

    pull_chunk(&mut tap);
    assert!(approx(engine.position().unwrap(), 0.01));

    engine.pause();
    assert!(pull_chunk(&mut tap).iter().all(|s| *s == 0.0));
    assert!(approx(engine.position().unwrap(), 0.01));

    engine.pause();
    assert!(pull_chunk(&mut tap).iter().all(|s| *s != 0.0));
    assert!(approx(engine.position().unwrap(), 0.02));
}

#[test]
fn finished_track_renders_silence_and_reports_full_position() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "end.wav");
    let (engine, backend) = engine();
    engine.play(&path).unwrap();
    let mut tap = backend.take_latest().unwrap();

    // One second is 100 chunks; pull a few past the end.
    for _ in 0..105 {
        assert_eq!(pull_chunk(&mut tap).len(), tap.chunk_len());
    }

    assert!(pull_chunk(&mut tap).iter().all(|s| *s == 0.0));
    let position = engine.position().unwrap();
    let duration = engine.duration().unwrap();
    assert!(position >= duration);
    assert!(approx(duration, 1.0));
    assert_eq!(engine.file_path(), path_str(&path));
}

#[test]
fn drained_stream_replaces_an_estimated_length_with_the_frames_read() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "estimate.wav");
    let decoder = rodio::Decoder::builder()
        .with_data(std::io::BufReader::new(fs::File::open(&path).unwrap()))
        .with_hint("wav")
        .build()
        .unwrap();
    let format = StreamFormat {
        sample_rate: 8_000,
        channels: 2,
    };
    let counter = StreamCounter::default();
    let mut stream = TrackStream::new(decoder, format, 12_345, counter.acquire());
    assert_eq!(stream.len(), 12_345);

    assert_eq!(stream.by_ref().count(), 16_000);
    assert_eq!(stream.next(), None);
    assert_eq!(stream.frame_position(), 8_000);
    assert_eq!(stream.len(), 8_000);
}

#[test]
fn stop_unloads_and_ends_the_tap() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "stop.wav");
    let (engine, backend) = engine();
    engine.play(&path).unwrap();
    let mut tap = backend.take_latest().unwrap();

    assert!(engine.stop());
    assert_eq!(tap.next(), None);
    assert_eq!(engine.file_path(), "");
    assert_eq!(engine.live_streams(), 0);
    assert!(!engine.stop());
}

#[test]
fn play_from_starts_at_offset() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "from.wav");
    let (engine, _backend) = engine();

    engine.play_from(&path, 0.25).unwrap();
    assert!(approx(engine.position().unwrap(), 0.25));

    let err = engine.play_from(&path, 5.0).unwrap_err();
    assert!(matches!(
        err,
        PlayError::StartOffset(SeekError::OutOfBounds { .. })
    ));
    assert_eq!(engine.file_path(), path_str(&path));
    assert!(approx(engine.position().unwrap(), 0.0));
}

#[test]
fn idle_engine_ignores_transport_and_reports_no_stream() {
    let (engine, _backend) = engine();

    engine.pause();
    engine.set_volume(-20.0);

    assert!(!engine.is_playing());
    assert!(!engine.is_muted());
    assert_eq!(engine.volume(), None);
    assert_eq!(engine.file_path(), "");
    assert!(engine.metadata().is_empty());
    assert!(engine.snapshot().is_none());
    assert_eq!(engine.position(), Err(StreamError::NoActiveStream));
    assert_eq!(engine.duration(), Err(StreamError::NoActiveStream));
    assert!(matches!(engine.seek(0.0), Err(SeekError::NoActiveStream)));
}

#[test]
fn metadata_and_snapshot_follow_loaded_track() {
    let dir = tempdir().unwrap();
    let path = wav(&dir, "tagged.wav");
    tag_file(
        &path,
        Tags {
            title: Some("So What"),
            artist: Some("Miles Davis"),
            ..Tags::default()
        },
    );
    let (engine, _backend) = engine();
    engine.play(&path).unwrap();
    engine.pause();
    engine.set_volume(-2.0);

    let snapshot = engine.snapshot().unwrap();
    assert_eq!(snapshot.metadata.title(), "So What");
    assert_eq!(snapshot.metadata.artist(), "Miles Davis");
    assert_eq!(snapshot.file_path, path_str(&path));
    assert!(!snapshot.playing);
    assert_eq!(snapshot.gain, -2.0);
    assert!(!snapshot.muted);
    assert!(approx(snapshot.duration, 1.0));
    assert_eq!(engine.metadata(), snapshot.metadata);
}

#[test]
fn transport_calls_are_safe_while_rendering() {
    let dir = tempdir().unwrap();
    let a = wav(&dir, "a.wav");
    let b = wav(&dir, "b.wav");
    let (engine, backend) = engine();
    engine.play(&a).unwrap();
    let tap = backend.take_latest().unwrap();

    let render = thread::spawn(move || tap.count());

    for i in 0..50 {
        let target = (i % 10) as f64 / 10.0;
        engine.seek(target).unwrap();
        let position = engine.position().unwrap();
        assert!(position <= engine.duration().unwrap());
        if i % 7 == 0 {
            engine.pause();
        }
        engine.set_volume(-(i % 6) as f64);
    }

    engine.play(&b).unwrap();
    let pulled = render.join().unwrap();
    assert!(pulled > 0);
    assert_eq!(engine.file_path(), path_str(&b));
    assert_eq!(engine.live_streams(), 1);
}
