#![allow(clippy::doc_markdown)]

//! lens-io - Safe file I/O for markdown vaults
//!
//! Everything that touches the vault on disk goes through this crate.
//!
//! # Features
//!
//! - **Safety**: Binary detection & size limits before decoding a note
//! - **Discovery**: Deterministic, sorted recursive note listing
//! - **Mutation**: Atomic same-directory replace for rewritten notes
//! - **Backup**: One timestamped zip snapshot of the vault per run
//!
//! # Architecture
//!
//! ```text
//! lens-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── detect.rs   # Binary detection & decoding
//! ├── sync.rs     # Guarded reads + atomic writes
//! ├── discover.rs # Vault traversal
//! └── backup.rs   # Zip snapshot of a directory tree
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lens_io::{discover_notes, read_text_safe, DiscoverOptions};
//!
//! for path in discover_notes("/vault", &DiscoverOptions::default())? {
//!     let content = read_text_safe(&path, 8 * 1024 * 1024)?;
//! }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod backup;
mod detect;
mod discover;
mod error;
mod sync;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use backup::{BackupArchive, BackupOptions, create_backup};
pub use discover::{DiscoverOptions, discover_notes};
pub use error::IoError;
pub use sync::{DEFAULT_MAX_NOTE_BYTES, read_text_safe, read_text_strict, write_text_atomic};

// Re-export detection utilities for advanced use
pub use detect::{decode_buffer, decode_buffer_strict, is_binary};
