use crate::config::SongField;

use super::model::Track;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Blank or missing fields are left out; when nothing is left the title is used.
pub fn display_from_fields(track: &Track, fields: &[SongField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let mut push = |value: Option<&str>| {
        if let Some(v) = value.map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(v.to_string());
        }
    };

    for f in fields {
        match f {
            SongField::Title => push(Some(&track.title)),
            SongField::Artist => push(track.artist.as_deref()),
            SongField::Album => push(track.album.as_deref()),
            SongField::Genre => push(track.genre.as_deref()),
            SongField::Year => push(track.year.as_deref()),
            SongField::Filename => push(track.path.file_stem().and_then(|s| s.to_str())),
            SongField::Path => push(track.path.to_str()),
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
