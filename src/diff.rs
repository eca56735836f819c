use crate::record::{DiffRecord, DiffStatus, Difference, FileRecord};
use crate::scan::Snapshot;
use std::time::{Duration, SystemTime};

/// Modification times at most this far apart are treated as equal.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Compare two snapshots and classify every path found in either of them.
///
/// The result holds exactly one record per path in the union of both
/// snapshots, ordered by byte-wise comparison of the relative paths. Both
/// snapshots are consumed and their records moved into the result.
///
/// # Classification
///
/// * `Added` - Path exists on the right only
/// * `Deleted` - Path exists on the left only
/// * `Modified` - Path exists on both sides and at least one attribute differs
/// * `Unchanged` - Path exists on both sides and no attribute differs
///
/// Attributes are compared as follows:
///
/// * A directory on one side and a non-directory on the other yields a
///   single [`Difference::Kind`] and nothing else.
/// * Two directories are always unchanged.
/// * Two non-directories are compared on size, modification time (with
///   [`MTIME_TOLERANCE`]) and permission bits, reporting every attribute
///   that differs.
pub fn compare(left: Snapshot, right: Snapshot) -> Vec<DiffRecord> {
    let mut left = left.into_entries();
    let mut right = right.into_entries();

    let mut paths: Vec<String> = left.keys().chain(right.keys()).cloned().collect();
    paths.sort_unstable();
    paths.dedup();

    paths
        .into_iter()
        .map(|path| {
            let left_record = left.remove(&path);
            let right_record = right.remove(&path);
            classify(path, left_record, right_record)
        })
        .collect()
}

fn classify(path: String, left: Option<FileRecord>, right: Option<FileRecord>) -> DiffRecord {
    let (status, differences) = match (&left, &right) {
        (None, Some(_)) => (DiffStatus::Added, Vec::new()),
        (Some(_), None) => (DiffStatus::Deleted, Vec::new()),
        (Some(l), Some(r)) => {
            let differences = compare_records(l, r);
            if differences.is_empty() {
                (DiffStatus::Unchanged, differences)
            } else {
                (DiffStatus::Modified, differences)
            }
        }
        // Every path comes from one of the two key sets.
        (None, None) => unreachable!("path {path} is in neither snapshot"),
    };

    DiffRecord {
        path,
        status,
        left,
        right,
        differences,
    }
}

/// List the attributes that differ between two records of the same path.
pub fn compare_records(left: &FileRecord, right: &FileRecord) -> Vec<Difference> {
    if left.is_directory != right.is_directory {
        return vec![Difference::Kind {
            left_is_directory: left.is_directory,
        }];
    }

    if left.is_directory {
        return Vec::new();
    }

    let mut differences = Vec::new();

    if left.size != right.size {
        differences.push(Difference::Size {
            left: left.size,
            right: right.size,
        });
    }

    if mtime_differs(left.modified_at, right.modified_at) {
        differences.push(Difference::ModifiedAt {
            left: left.modified_at,
            right: right.modified_at,
        });
    }

    if left.permissions != right.permissions {
        differences.push(Difference::Permissions {
            left: left.permissions,
            right: right.permissions,
        });
    }

    differences
}

/// True when the two times are more than [`MTIME_TOLERANCE`] apart.
pub fn mtime_differs(left: SystemTime, right: SystemTime) -> bool {
    let drift = match left.duration_since(right) {
        Ok(drift) => drift,
        Err(e) => e.duration(),
    };
    drift > MTIME_TOLERANCE
}
