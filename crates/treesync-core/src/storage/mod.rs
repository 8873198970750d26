//! Disk I/O and file lifecycle.
//!
//! Downloads are written to `<name>.part` and renamed into place once
//! complete, so a file at its final name is always whole. The move helpers
//! implement the data directory swaps and treat a missing source as a no-op.

mod moves;
mod writer;

pub use moves::{delete_dir_if_exists, move_dir_if_exists, move_file_if_exists, remove_dir_if_empty};
pub use writer::PartFileWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path
/// (e.g. `Skill-0.png` → `Skill-0.png.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
