#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

use pizza_sales::loader::{SourceKind, SourcePaths};

/// Returns the directory holding the sample pizza sales dataset.
pub fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("sample")
}

/// Scratch directory holding a copy of the sample dataset that tests can edit.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates an empty scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Creates a scratch directory pre-populated with the sample dataset.
    pub fn with_sample() -> Self {
        let workspace = Self::new();
        for kind in SourceKind::ALL {
            let name = kind.default_file_name();
            fs::copy(sample_dir().join(name), workspace.path().join(name))
                .expect("copy sample source");
        }
        workspace
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn paths(&self) -> SourcePaths {
        SourcePaths::in_dir(self.path())
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Rewrites one source of the dataset.
    pub fn replace(&self, kind: SourceKind, contents: &str) -> PathBuf {
        self.write(kind.default_file_name(), contents)
    }
}

/// Approximate float equality for money sums.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
