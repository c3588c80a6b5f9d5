//! Shared test utilities for integration tests.
//!
//! This module provides a project fixture, a counting transfer and helper
//! functions to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("src/main/play/contact-email.txt", "a@b.c");
//!     let mut engine = fixture.engine(&["main"], "release");
//!     // ... test code
//! }
//! ```

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use play_resources::error::Result;
use play_resources::filesystem::{DiskTransfer, Transfer};
use play_resources::overlay::{OverlayResolver, Variant};
use play_resources::sync::SyncEngine;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::CountingTransfer;
    pub use super::TestFixture;
}

/// Install `env_logger` once so `RUST_LOG=debug cargo test` shows pass logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A [`Transfer`] that counts operations and forwards them to the disk.
#[derive(Debug, Default)]
pub struct CountingTransfer {
    pub copies: usize,
    pub removals: usize,
    pub clears: usize,
    disk: DiskTransfer,
}

impl CountingTransfer {
    /// Total number of operations that changed the output directory.
    pub fn total(&self) -> usize {
        self.copies + self.removals + self.clears
    }

    pub fn reset(&mut self) {
        self.copies = 0;
        self.removals = 0;
        self.clears = 0;
    }
}

impl Transfer for CountingTransfer {
    fn copy_file(&mut self, src: &Path, dst: &Path) -> Result<()> {
        self.copies += 1;
        self.disk.copy_file(src, dst)
    }

    fn create_dir(&mut self, dir: &Path) -> Result<()> {
        self.disk.create_dir(dir)
    }

    fn remove(&mut self, path: &Path) -> Result<bool> {
        let removed = self.disk.remove(path)?;
        if removed {
            self.removals += 1;
        }
        Ok(removed)
    }

    fn clear_dir(&mut self, dir: &Path) -> Result<()> {
        self.clears += 1;
        self.disk.clear_dir(dir)
    }
}

/// A temporary Android-style project with `src/<source-set>/play` trees.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        init_logging();
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given project-relative path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    /// Add an empty directory.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Write (or overwrite) a file and return its absolute path.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let child = self.temp_dir.child(path);
        child.write_str(content).expect("Failed to write file");
        child.path().to_path_buf()
    }

    /// Delete a file and return its absolute path.
    #[allow(dead_code)]
    pub fn delete(&self, path: &str) -> PathBuf {
        let file = self.source(path);
        std::fs::remove_file(&file).expect("Failed to delete file");
        file
    }

    /// Absolute path of a project-relative path.
    pub fn source(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The merged output directory used by [`TestFixture::engine`].
    pub fn output(&self) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child("build/generated/play/res")
    }

    /// Resolver for a variant named `<flavors...>-<build_type>` whose source
    /// sets are `main`, the flavors, then the build type.
    pub fn resolver(&self, flavors: &[&str], build_type: &str) -> OverlayResolver {
        let mut name: Vec<&str> = flavors.to_vec();
        name.push(build_type);
        let mut source_sets = vec!["main".to_string()];
        source_sets.extend(flavors.iter().map(|f| f.to_string()));
        source_sets.push(build_type.to_string());
        OverlayResolver::new(
            self.path(),
            "play",
            Variant::new(name.join("-"), source_sets),
        )
    }

    /// Engine writing to [`TestFixture::output`] through a [`CountingTransfer`].
    pub fn engine(&self, flavors: &[&str], build_type: &str) -> SyncEngine<CountingTransfer> {
        SyncEngine::new(
            self.resolver(flavors, build_type),
            self.output().path(),
            CountingTransfer::default(),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
