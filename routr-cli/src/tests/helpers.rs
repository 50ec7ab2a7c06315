//! Test helpers for composing input tables on disk.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Header line of every well-formed input table.
pub(super) const INPUT_HEADER: &str = "origin_long,origin_lat,dest_long,dest_lat";

/// Temporary directory with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `lines` (newline-terminated) to `name` and return its path.
    pub(super) fn write_table(&self, name: &str, lines: &[&str]) -> Utf8PathBuf {
        let path = self.path(name);
        let mut contents = lines.join("\n");
        contents.push('\n');
        write_utf8(&path, contents.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}
