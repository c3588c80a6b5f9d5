//! Index of files contributed by sibling flavor overlays.
//!
//! Rather than probing `src/<other-flavor>/<path>` on disk for every changed
//! file, the index walks every flavor-tier root once per pass and records
//! which flavors contribute each relative path. Directories are indexed too,
//! so a file in one flavor collides with a directory of the same name in
//! another. A path with more than one contributor is a conflict.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::overlay::{OverlayResolver, ResourceRoot, Tier};
use crate::path::relative_to;

/// A relative path within one priority tier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DuplicateKey {
    pub tier: Tier,
    /// Path relative to the overlay's source-set directory (`play/...`).
    pub path: PathBuf,
}

impl DuplicateKey {
    /// Key for `file` inside `root`, or `None` when `file` is not under the
    /// root's source-set directory.
    pub fn for_file(root: &ResourceRoot, file: &Path) -> Option<Self> {
        relative_to(file, &root.source_set_dir).map(|path| Self {
            tier: root.tier,
            path: path.to_path_buf(),
        })
    }
}

/// Maps (tier, relative path) to the overlays contributing it, in overlay
/// declaration order.
#[derive(Debug, Default, Clone)]
pub struct DuplicateIndex {
    entries: BTreeMap<DuplicateKey, Vec<String>>,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk every existing flavor-tier root of `resolver` and index every
    /// file and directory under it.
    pub fn build(resolver: &OverlayResolver) -> Result<Self> {
        let mut index = Self::new();
        for root in resolver
            .roots()
            .iter()
            .filter(|root| root.tier == Tier::Flavor && root.path.is_dir())
        {
            for entry in WalkDir::new(&root.path).min_depth(1).follow_links(false) {
                index.insert(root, entry?.path());
            }
        }
        debug!(
            "Indexed {} flavor path(s), {} conflicting",
            index.len(),
            index.conflicts().count()
        );
        Ok(index)
    }

    /// Record that `root` contributes `file`.
    pub fn insert(&mut self, root: &ResourceRoot, file: &Path) {
        if let Some(key) = DuplicateKey::for_file(root, file) {
            let owners = self.entries.entry(key).or_default();
            if !owners.contains(&root.name) {
                owners.push(root.name.clone());
            }
        }
    }

    /// Overlays contributing `key`.
    pub fn contributors(&self, key: &DuplicateKey) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first overlay other than `root` that contributes the same
    /// relative path as `file` in the same tier.
    pub fn conflict_for(&self, root: &ResourceRoot, file: &Path) -> Option<&str> {
        let key = DuplicateKey::for_file(root, file)?;
        self.contributors(&key)
            .iter()
            .find(|name| **name != root.name)
            .map(String::as_str)
    }

    /// Every key contributed by two or more overlays.
    pub fn conflicts(&self) -> impl Iterator<Item = (&DuplicateKey, &[String])> {
        self.entries
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(key, owners)| (key, owners.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
