//! Directory scanning, catalog import, and the track rows the UI lists.

mod display;
mod import;
mod model;
mod scan;

pub use display::display_from_fields;
pub use import::{ImportEvent, ImportSummary, import_directory, import_file};
pub use model::Track;
pub use scan::{files, scan};
