//! Recursive, read-only scan of a directory tree into a [`Snapshot`].
//!
//! The walk records every file, directory and symlink below the root (the
//! root itself is never recorded), keyed by its root-relative path with
//! components joined by `/` (see [`escape_name`]). Symlinks are never
//! followed; they are recorded with their own `lstat` metadata.
//!
//! Problems with individual entries are logged and the entry is skipped, so
//! a single unreadable file never aborts a scan. Only failing to list the
//! root is fatal.

use crate::record::{FileRecord, Permissions};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::{Metadata, ReadDir};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Cannot read directory {}: {source}", root.display())]
    RootAccess { root: PathBuf, source: io::Error },
}

/// An entry left out of a snapshot because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// All entries found below one root, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, FileRecord>,
    skipped: Vec<SkippedEntry>,
}

impl Snapshot {
    #[cfg(test)]
    pub fn get(&self, relative_path: &str) -> Option<&FileRecord> {
        self.entries.get(relative_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries that were left out because they could not be read.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn into_entries(self) -> BTreeMap<String, FileRecord> {
        self.entries
    }

    fn insert(&mut self, record: FileRecord) {
        self.entries.insert(record.relative_path.clone(), record);
    }

    fn skip(&mut self, path: &Path, reason: impl ToString) {
        let reason = reason.to_string();
        warn!("Skipping {}: {}", path.display(), reason);
        self.skipped.push(SkippedEntry {
            path: path.to_path_buf(),
            reason,
        });
    }
}

impl FromIterator<FileRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::default();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// Scan the tree below `root`.
///
/// # Errors
///
/// Returns [`ScanError::RootAccess`] if `root` itself cannot be listed. No
/// partial snapshot is returned in that case. Any failure below the root is
/// logged, recorded in [`Snapshot::skipped`] and otherwise ignored.
pub fn scan(root: &Path) -> Result<Snapshot, ScanError> {
    info!("Scanning {}", root.display());

    let read_dir = std::fs::read_dir(root).map_err(|source| ScanError::RootAccess {
        root: root.to_path_buf(),
        source,
    })?;

    let mut snapshot = Snapshot::default();
    walk_directory(root, root, read_dir, &mut snapshot);

    info!(
        "Scanned {}: {} entries, {} skipped",
        root.display(),
        snapshot.len(),
        snapshot.skipped.len()
    );

    Ok(snapshot)
}

fn walk_directory(root: &Path, dir: &Path, read_dir: ReadDir, snapshot: &mut Snapshot) {
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                snapshot.skip(dir, format!("failed to read directory entry: {e}"));
                continue;
            }
        };
        let path = entry.path();

        let metadata = match std::fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                snapshot.skip(&path, e);
                continue;
            }
        };

        let relative_path = match relative_key(root, &path) {
            Some(relative_path) => relative_path,
            None => {
                snapshot.skip(&path, "path is not below the scan root");
                continue;
            }
        };

        let record = match file_record(relative_path, path.clone(), &metadata) {
            Ok(record) => record,
            Err(e) => {
                snapshot.skip(&path, e);
                continue;
            }
        };

        let is_directory = record.is_directory;
        snapshot.insert(record);

        if is_directory {
            debug!("Descending into {}", path.display());
            // The directory itself stays recorded even if its children
            // cannot be listed.
            match std::fs::read_dir(&path) {
                Ok(children) => walk_directory(root, &path, children, snapshot),
                Err(e) => snapshot.skip(&path, format!("cannot list directory contents: {e}")),
            }
        }
    }
}

fn file_record(
    relative_path: String,
    absolute_path: PathBuf,
    metadata: &Metadata,
) -> io::Result<FileRecord> {
    Ok(FileRecord {
        relative_path,
        absolute_path,
        size: metadata.len(),
        modified_at: metadata.modified()?,
        is_directory: metadata.is_dir(),
        permissions: Permissions::from_metadata(metadata),
    })
}

/// Root-relative key for `path` with components joined by `/`.
///
/// Returns `None` for paths outside `root` and for the root itself.
/// Names are escaped with [`escape_name`], so distinct paths always get
/// distinct keys.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let components: Vec<_> = relative
        .components()
        .map(|c| escape_name(c.as_os_str()))
        .collect();

    if components.is_empty() {
        None
    } else {
        Some(components.join("/"))
    }
}

/// Lossless string form of a single file name.
///
/// Valid UTF-8 passes through unchanged except that `\` becomes `\\`.
/// Bytes that are not valid UTF-8 become `\xNN`.
pub fn escape_name(name: &OsStr) -> Cow<'_, str> {
    if let Some(name) = name.to_str()
        && !name.contains('\\')
    {
        return Cow::Borrowed(name);
    }

    let mut escaped = String::new();
    for chunk in name.as_encoded_bytes().utf8_chunks() {
        escaped.push_str(&chunk.valid().replace('\\', "\\\\"));
        for byte in chunk.invalid() {
            escaped.push_str(&format!("\\x{byte:02x}"));
        }
    }
    Cow::Owned(escaped)
}
