//! # Change Feed
//!
//! The sync engine does no change detection of its own. Each pass is driven
//! by a [`ChangeFeed`]: whether the pass is incremental, which source paths
//! were added or modified, and which were removed since the previous pass.
//!
//! Hosts with their own incremental machinery build the feed directly.
//! [`Snapshot`] is a small detector for hosts without one: it fingerprints
//! every file under the resolver's roots and diffs against the snapshot
//! taken after the previous pass. Snapshots are the detector's state, not
//! the engine's; the host decides where (and whether) to keep them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::Result;
use crate::overlay::OverlayResolver;

/// Input to one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFeed {
    /// `false` for a first or forced full pass, which clears the output.
    pub incremental: bool,
    /// Added or modified source paths, in processing order.
    pub changed: Vec<PathBuf>,
    /// Source paths that no longer exist.
    pub removed: Vec<PathBuf>,
}

impl ChangeFeed {
    /// A non-incremental pass over `files`.
    pub fn full(files: Vec<PathBuf>) -> Self {
        Self {
            incremental: false,
            changed: files,
            removed: Vec::new(),
        }
    }

    /// An incremental pass.
    pub fn incremental(changed: Vec<PathBuf>, removed: Vec<PathBuf>) -> Self {
        Self {
            incremental: true,
            changed,
            removed,
        }
    }

    /// A full pass over everything currently under the resolver's roots.
    pub fn rescan(resolver: &OverlayResolver) -> Result<Self> {
        Ok(Self::full(resolver.scan()?))
    }

    /// Whether an incremental pass would have nothing to do.
    pub fn is_empty(&self) -> bool {
        self.incremental && self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Content fingerprint of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub size: u64,
    /// Hex-encoded SHA-256 of the file contents.
    pub sha256: String,
}

impl Fingerprint {
    pub fn of_file(path: &Path) -> Result<Self> {
        let contents = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&contents);
        Ok(Self {
            size: contents.len() as u64,
            sha256: hex::encode(hasher.finalize()),
        })
    }
}

/// Fingerprints of every file under a resolver's roots at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    files: BTreeMap<PathBuf, Fingerprint>,
}

impl Snapshot {
    /// Fingerprint every regular file currently under `resolver`'s roots.
    pub fn capture(resolver: &OverlayResolver) -> Result<Self> {
        let mut files = BTreeMap::new();
        for root in resolver.roots().iter().filter(|root| root.path.is_dir()) {
            for entry in WalkDir::new(&root.path).min_depth(1).follow_links(false) {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.insert(
                        entry.path().to_path_buf(),
                        Fingerprint::of_file(entry.path())?,
                    );
                }
            }
        }
        Ok(Self { files })
    }

    /// Compute the feed that brings an output synced at `previous` up to
    /// this snapshot. Without a previous snapshot the feed is a full pass.
    ///
    /// Changed paths follow the resolver's root order so that, when two
    /// permitted overlays map to the same destination, the higher-priority
    /// one is copied last.
    pub fn diff(&self, previous: Option<&Snapshot>, resolver: &OverlayResolver) -> ChangeFeed {
        let changed = self
            .files
            .iter()
            .filter(|(path, fingerprint)| {
                previous.map_or(true, |prev| prev.files.get(*path) != Some(*fingerprint))
            })
            .map(|(path, _)| path.clone());
        let mut changed: Vec<PathBuf> = changed.collect();
        changed.sort_by_key(|path| root_rank(resolver, path));

        match previous {
            None => ChangeFeed::full(changed),
            Some(prev) => {
                let removed = prev
                    .files
                    .keys()
                    .filter(|path| !self.files.contains_key(*path))
                    .cloned()
                    .collect();
                ChangeFeed::incremental(changed, removed)
            }
        }
    }

    /// Load a snapshot previously written by [`Snapshot::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write this snapshot as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Position of the root owning `path`; unowned paths sort last.
fn root_rank(resolver: &OverlayResolver, path: &Path) -> usize {
    resolver
        .roots()
        .iter()
        .position(|root| root.contains(path))
        .unwrap_or(usize::MAX)
}
