//! Synchronous note reads and writes.
//!
//! The whole run is single-threaded, so every note is read and rewritten
//! through these two functions.

use std::fs as std_fs;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::detect::{decode_buffer, decode_buffer_strict};
use crate::error::IoError;

/// Upper bound for a single note (8MB). Larger files are not notes.
pub const DEFAULT_MAX_NOTE_BYTES: u64 = 8 * 1024 * 1024;

/// Read text from a file with size and binary checks.
///
/// # Arguments
/// * `path` - Path to the file
/// * `max_bytes` - Maximum file size in bytes
///
/// # Returns
/// Decoded text content or an error.
///
/// # Example
///
/// ```rust,ignore
/// use lens_io::read_text_safe;
///
/// let content = read_text_safe("Inbox.md", 1024 * 1024)?;
/// ```
///
/// # Errors
/// `NotFound` when metadata cannot be read, `TooLarge` above `max_bytes`,
/// `BinaryFile` for NUL-containing content, `System` for read failures.
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    decode_buffer(read_guarded(path.as_ref(), max_bytes)?)
}

/// Like [`read_text_safe`], but invalid UTF-8 is an error instead of being
/// replaced. Use this for notes that are about to be rewritten.
///
/// # Errors
/// The errors of [`read_text_safe`], plus `Encoding` for invalid UTF-8.
pub fn read_text_strict<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    decode_buffer_strict(read_guarded(path.as_ref(), max_bytes)?)
}

fn read_guarded(path: &Path, max_bytes: u64) -> Result<Vec<u8>, IoError> {
    let metadata = std_fs::metadata(path)
        .map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = std_fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Replace the content of `path` with `content`.
///
/// The text goes to a temporary file next to the target first and is then
/// renamed over it, so readers never observe a half-written note. An
/// existing target keeps its permissions.
///
/// # Errors
/// Returns `IoError::System` when the temporary file cannot be created,
/// written, or renamed onto the target.
pub fn write_text_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    if let Ok(metadata) = std_fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.persist(path).map_err(|err| IoError::System(err.error))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "note written");
    Ok(())
}
