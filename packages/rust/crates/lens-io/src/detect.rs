//! Text-or-attachment decision for raw note bytes.

use memchr::memchr;

use crate::error::IoError;

/// Prefix length scanned for NUL bytes.
const BINARY_SNIFF_BYTES: usize = 8192;

/// Whether `buffer` looks like an attachment rather than a note.
///
/// A NUL byte anywhere in the first 8 KiB marks the file as binary; bytes
/// after the prefix are not inspected.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let prefix = buffer.get(..BINARY_SNIFF_BYTES).unwrap_or(buffer);
    memchr(0, prefix).is_some()
}

/// Turn note bytes into text.
///
/// Invalid UTF-8 is replaced with U+FFFD instead of failing the run.
///
/// # Errors
/// `IoError::BinaryFile` when [`is_binary`] rejects the buffer.
pub fn decode_buffer(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    String::from_utf8(buffer).or_else(|invalid| {
        let bytes = invalid.into_bytes();
        tracing::warn!(bytes = bytes.len(), "note is not valid UTF-8, decoding lossily");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    })
}

/// Turn note bytes into text, rejecting anything that is not valid UTF-8.
///
/// Used before a note is rewritten, where a lossy decode would replace the
/// original bytes on disk.
///
/// # Errors
/// `IoError::BinaryFile` as in [`decode_buffer`], `IoError::Encoding` with the
/// offset of the first invalid byte.
pub fn decode_buffer_strict(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    String::from_utf8(buffer).map_err(|invalid| IoError::Encoding(invalid.utf8_error().valid_up_to()))
}
