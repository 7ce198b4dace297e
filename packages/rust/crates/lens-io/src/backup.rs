//! Zip snapshot of a vault directory.
//!
//! Mutating runs take one snapshot before the first note is rewritten; there
//! is no other rollback mechanism.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::IoError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Options for backup creation.
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Archive file name prefix, followed by `-<timestamp>.zip`.
    pub prefix: String,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            prefix: "vault-backup".to_string(),
        }
    }
}

/// A finished, verified backup archive.
#[derive(Debug, Clone, Serialize)]
pub struct BackupArchive {
    /// Location of the zip file.
    pub path: PathBuf,
    /// Number of files and directories stored.
    pub entries: usize,
    /// Archive size on disk.
    pub size_bytes: u64,
}

/// Snapshot `source_dir` recursively into a new zip below `backup_dir`.
///
/// The archive is named after the local time of the call. When the backup
/// directory lives inside the source tree it is left out of the snapshot.
///
/// # Errors
/// `NotADirectory` for a missing source, `Archive` for zip failures or an
/// empty result file, `System`/`Walk` for filesystem failures.
pub fn create_backup<S: AsRef<Path>, B: AsRef<Path>>(
    source_dir: S,
    backup_dir: B,
    options: &BackupOptions,
) -> Result<BackupArchive, IoError> {
    let source_dir = source_dir.as_ref();
    let backup_dir = backup_dir.as_ref();
    if !source_dir.is_dir() {
        return Err(IoError::NotADirectory(
            source_dir.to_string_lossy().to_string(),
        ));
    }
    fs::create_dir_all(backup_dir)?;

    let archive_path = next_archive_path(backup_dir, &options.prefix);
    let excluded = fs::canonicalize(backup_dir)?;

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);
    let file_options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0usize;
    let walker = WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || fs::canonicalize(entry.path()).map_or(true, |path| path != excluded)
        });
    for entry in walker {
        let entry = entry?;
        let Some(name) = archive_name(source_dir, entry.path()) else {
            continue;
        };
        if entry.file_type().is_dir() {
            zip.add_directory(name, file_options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, file_options)?;
            let mut reader = File::open(entry.path())?;
            io::copy(&mut reader, &mut zip)?;
        } else {
            continue;
        }
        entries += 1;
    }
    zip.finish()?;

    let size_bytes = fs::metadata(&archive_path)?.len();
    if size_bytes == 0 {
        return Err(IoError::Archive(format!(
            "backup archive `{}` is empty",
            archive_path.display()
        )));
    }

    tracing::info!(
        archive = %archive_path.display(),
        entries,
        size_bytes,
        "vault backup written"
    );
    Ok(BackupArchive {
        path: archive_path,
        entries,
        size_bytes,
    })
}

fn next_archive_path(backup_dir: &Path, prefix: &str) -> PathBuf {
    let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let mut candidate = backup_dir.join(format!("{prefix}-{stamp}.zip"));
    let mut attempt = 1u32;
    while candidate.exists() {
        candidate = backup_dir.join(format!("{prefix}-{stamp}-{attempt}.zip"));
        attempt += 1;
    }
    candidate
}

/// Relative, `/`-separated archive entry name; `None` for the root itself.
fn archive_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
