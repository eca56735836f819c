//! Value types shared by the scanner, the comparator and the reporter.
//!
//! Everything here is built once per scan or compare pass and never mutated
//! afterwards. Ownership moves from the scanner into the comparator, which
//! moves the records into the resulting [`DiffRecord`]s.

use serde::Serialize;
use std::fmt;
use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

/// Owner/group/other read, write and execute bits.
///
/// Special bits (setuid, setgid, sticky) and file type bits are masked out
/// at construction, so two values compare equal exactly when their basic
/// permissions match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permissions(u32);

impl Permissions {
    pub const MASK: u32 = 0o777;

    pub fn from_mode(mode: u32) -> Self {
        Permissions(mode & Self::MASK)
    }

    #[cfg(test)]
    pub fn mode(self) -> u32 {
        self.0
    }

    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        use std::os::unix::fs::PermissionsExt;
        Self::from_mode(metadata.permissions().mode())
    }

    /// Without POSIX modes the read-only flag is the only information
    /// available, so it is mapped onto the usual equivalent modes.
    #[cfg(not(unix))]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let readonly = metadata.permissions().readonly();
        let mode = match (metadata.is_dir(), readonly) {
            (true, true) => 0o555,
            (true, false) => 0o777,
            (false, true) => 0o444,
            (false, false) => 0o666,
        };
        Self::from_mode(mode)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SYMBOLS: [char; 3] = ['r', 'w', 'x'];
        for shift in (0..9).rev() {
            let symbol = SYMBOLS[2 - shift % 3];
            if self.0 & (1 << shift) != 0 {
                write!(f, "{symbol}")?;
            } else {
                f.write_str("-")?;
            }
        }
        Ok(())
    }
}

impl fmt::Octal for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

/// One entry of a scanned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the scan root, components joined with `/`.
    pub relative_path: String,
    /// Where the entry was found. Informational only, never compared.
    pub absolute_path: PathBuf,
    /// Byte count as reported by `lstat`. Meaningless for directories.
    pub size: u64,
    pub modified_at: SystemTime,
    pub is_directory: bool,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Present on the right only.
    Added,
    /// Present on the left only.
    Deleted,
    /// Present on both sides with at least one differing attribute.
    Modified,
    Unchanged,
}

/// A single attribute that differs between the two sides of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// One side is a directory and the other is not. When this is reported
    /// no other attribute is compared for the path.
    Kind { left_is_directory: bool },
    Size { left: u64, right: u64 },
    ModifiedAt { left: SystemTime, right: SystemTime },
    Permissions { left: Permissions, right: Permissions },
}

impl Difference {
    /// Stable name of the attribute, used as the `field` key in reports.
    pub fn field(&self) -> &'static str {
        match self {
            Difference::Kind { .. } => "type",
            Difference::Size { .. } => "size",
            Difference::ModifiedAt { .. } => "mtime",
            Difference::Permissions { .. } => "permissions",
        }
    }
}

/// Outcome of comparing one relative path.
///
/// `left` is `None` exactly when the status is `Added`, `right` is `None`
/// exactly when it is `Deleted`, and `differences` is non-empty exactly when
/// it is `Modified`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub path: String,
    pub status: DiffStatus,
    pub left: Option<FileRecord>,
    pub right: Option<FileRecord>,
    pub differences: Vec<Difference>,
}
