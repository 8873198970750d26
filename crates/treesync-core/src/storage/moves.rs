//! Move/delete helpers where a missing source is not an error.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{IoContext, Result};

/// Moves `src` onto `dst`, replacing an existing `dst` file. Returns whether
/// anything was moved.
pub fn move_file_if_exists(src: &Path, dst: &Path) -> Result<bool> {
    if !src.is_file() {
        return Ok(false);
    }
    ensure_parent(dst)?;
    rename_or_copy(src, dst)?;
    Ok(true)
}

/// Moves directory `src` to `dst`. An existing `dst` directory is removed
/// first so the result is exactly the contents of `src`. Returns whether
/// anything was moved.
pub fn move_dir_if_exists(src: &Path, dst: &Path) -> Result<bool> {
    if !src.is_dir() {
        return Ok(false);
    }
    delete_dir_if_exists(dst)?;
    ensure_parent(dst)?;
    rename_or_copy(src, dst)?;
    Ok(true)
}

/// Recursively deletes `dir` if present. Returns whether it existed.
pub fn delete_dir_if_exists(dir: &Path) -> Result<bool> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).at_path(dir),
    }
}

/// Deletes `dir` only if it is empty; leftovers are kept and logged.
pub fn remove_dir_if_empty(dir: &Path) -> Result<bool> {
    match fs::remove_dir(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            if dir.is_dir() {
                tracing::warn!(
                    path = %dir.display(),
                    "directory not empty, leaving in place: {}",
                    e
                );
                Ok(false)
            } else {
                Err(e).at_path(dir)
            }
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).at_path(parent)?;
    }
    Ok(())
}

/// `rename`, falling back to copy + delete when `src` and `dst` are on
/// different filesystems.
fn rename_or_copy(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            tracing::debug!(
                src = %src.display(),
                dst = %dst.display(),
                "cross-device move, copying"
            );
            if src.is_dir() {
                copy_dir_recursive(src, dst)?;
                fs::remove_dir_all(src).at_path(src)
            } else {
                fs::copy(src, dst).at_path(dst)?;
                fs::remove_file(src).at_path(src)
            }
        }
        Err(e) => Err(e).at_path(dst),
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).at_path(dst)?;
    for entry in fs::read_dir(src).at_path(src)? {
        let entry = entry.at_path(src)?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to).at_path(&to)?;
        }
    }
    Ok(())
}
