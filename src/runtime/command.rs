use std::path::PathBuf;

use turntable::catalog::{PlaylistId, SongId};

pub const USAGE: &str = "\
usage: turntable [command]

  (none)                          browse the library
  play <file>                     browse the library and play <file>
  import <dir>                    add every audio file under <dir>
  songs                           list the library
  playlists                       list playlists
  playlist <id>                   browse a playlist
  playlist-new <name> [desc]      create a playlist
  playlist-add <playlist> <song>  append a song to a playlist
  config                          print the effective settings";

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Browse,
    Play(PathBuf),
    Import(PathBuf),
    Songs,
    Playlists,
    Playlist(PlaylistId),
    PlaylistNew {
        name: String,
        description: Option<String>,
    },
    PlaylistAdd {
        playlist: PlaylistId,
        song: SongId,
    },
    Config,
    Help,
}

fn id(arg: Option<String>, what: &str) -> Result<i64, String> {
    let arg = arg.ok_or_else(|| format!("missing {what}"))?;
    arg.parse()
        .map_err(|_| format!("{what} must be a number, got {arg:?}"))
}

fn required(arg: Option<String>, what: &str) -> Result<String, String> {
    arg.ok_or_else(|| format!("missing {what}"))
}

/// Parse arguments, not including the program name.
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        return Ok(Command::Browse);
    };

    let command = match name.as_str() {
        "play" => Command::Play(required(args.next(), "file")?.into()),
        "import" => Command::Import(required(args.next(), "directory")?.into()),
        "songs" => Command::Songs,
        "playlists" => Command::Playlists,
        "playlist" => Command::Playlist(PlaylistId(id(args.next(), "playlist id")?)),
        "playlist-new" => Command::PlaylistNew {
            name: required(args.next(), "playlist name")?,
            description: args.next(),
        },
        "playlist-add" => Command::PlaylistAdd {
            playlist: PlaylistId(id(args.next(), "playlist id")?),
            song: SongId(id(args.next(), "song id")?),
        },
        "config" => Command::Config,
        "help" | "-h" | "--help" => Command::Help,
        other => return Err(format!("unknown command {other:?}")),
    };

    match args.next() {
        Some(extra) => Err(format!("unexpected argument {extra:?}")),
        None => Ok(command),
    }
}
