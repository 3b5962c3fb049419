//! Settings for playback, keys, the UI, import, the catalog and logging.
//!
//! Values come from built-in defaults, then `config.toml` (see
//! [`resolve_config_path`]), then `TURNTABLE__*` environment variables.
//! [`Settings::validate`] rejects values the player cannot use and
//! [`Settings::to_toml`] prints the merged result for `turntable config`.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
