//! Fixture builders shared by unit tests.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{Accessor, Tag, TagExt, TagType};

/// Write a 16-bit PCM WAV of `frames` frames: a quiet ramp so samples are
/// non-zero and distinguishable from silence.
pub fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let v = 1000 + (i % 1000) as i16;
        for _ in 0..channels {
            writer.write_sample(v).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// One second of stereo audio at 8 kHz.
pub fn write_short_wav(path: &Path) {
    write_wav(path, 8_000, 2, 8_000);
}

pub struct Tags<'a> {
    pub title: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
    pub genre: Option<&'a str>,
    pub cover_png: Option<&'a [u8]>,
}

impl Default for Tags<'_> {
    fn default() -> Self {
        Self {
            title: None,
            artist: None,
            album: None,
            genre: None,
            cover_png: None,
        }
    }
}

/// Attach an ID3v2 tag to an existing file.
pub fn tag_file(path: &Path, tags: Tags<'_>) {
    let mut tag = Tag::new(TagType::Id3v2);
    if let Some(v) = tags.title {
        tag.set_title(v.to_string());
    }
    if let Some(v) = tags.artist {
        tag.set_artist(v.to_string());
    }
    if let Some(v) = tags.album {
        tag.set_album(v.to_string());
    }
    if let Some(v) = tags.genre {
        tag.set_genre(v.to_string());
    }
    if let Some(png) = tags.cover_png {
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Png),
            None,
            png.to_vec(),
        ));
    }
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}
