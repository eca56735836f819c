use assert_cmd::{Command, cargo::cargo_bin_cmd};
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixed modification time used for files that should compare as unchanged.
pub const MTIME: i64 = 1_704_067_200;

// Each integration test file is compiled as its own crate and uses only some
// of these helpers.
#[allow(dead_code)]
pub fn treecmp_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("treecmp");
    cmd.arg("-C").arg(cwd);
    cmd
}

#[allow(dead_code)]
pub fn compare_dirs_cmd(left: &Path, right: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("treecmp");
    cmd.arg("--left").arg(left).arg("--right").arg(right);
    cmd
}

#[allow(dead_code)]
pub fn compare_cmd(trees: &Trees) -> Command {
    compare_dirs_cmd(&trees.left(), &trees.right())
}

/// A temporary directory holding an empty `left` and `right` tree.
pub struct Trees {
    pub temp: TempDir,
}

impl Trees {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("left")).unwrap();
        fs::create_dir(temp.path().join("right")).unwrap();
        Trees { temp }
    }

    pub fn left(&self) -> PathBuf {
        self.temp.path().join("left")
    }

    pub fn right(&self) -> PathBuf {
        self.temp.path().join("right")
    }
}

#[allow(dead_code)]
pub fn write_file(path: &Path, content: &str, mtime_secs: i64, mtime_nanos: u32) {
    fs::write(path, content).unwrap();
    set_file_mtime(path, FileTime::from_unix_time(mtime_secs, mtime_nanos)).unwrap();
}

#[allow(dead_code)]
pub fn write_same_file(trees: &Trees, relative: &str, content: &str) {
    write_file(&trees.left().join(relative), content, MTIME, 0);
    write_file(&trees.right().join(relative), content, MTIME, 0);
}
