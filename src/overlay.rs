//! # Overlay Resolution
//!
//! A build variant is assembled from several source sets (`main`, each
//! product flavor, the flavor combination, the build type, the full variant).
//! Each one may contribute Play resources under `src/<name>/<play_path>`.
//! This module turns the variant model into an ordered list of
//! [`ResourceRoot`]s and maps any file inside one of them to its place in the
//! merged output tree.
//!
//! ## Key Components
//!
//! - **`Variant`**: the external build-variant model: the composite base name
//!   (`demo-full-release`) and the source-set names, lowest priority first.
//! - **`Tier`**: the priority tier an overlay belongs to. Overlays in the
//!   `Flavor` tier are siblings and must not contribute identical paths.
//! - **`OverlayResolver`**: owns the roots and answers `owner`, `destination`
//!   and `flavor_names`.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::relative_to;

/// Source-set name shared by every variant.
pub const MAIN_SOURCE_SET: &str = "main";

/// Directory holding per-source-set sources, relative to the project.
pub const SOURCE_DIR: &str = "src";

/// Default subpath of a source set that holds Play resources.
pub const DEFAULT_PLAY_PATH: &str = "play";

/// The build-variant model the resolver is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Composite base name: flavor names followed by the build type, joined
    /// with `-` (for example `demo-full-release`).
    pub name: String,
    /// Source-set names in priority order, lowest first.
    pub source_sets: Vec<String>,
}

impl Variant {
    pub fn new<S: Into<String>>(name: S, source_sets: Vec<String>) -> Self {
        Self {
            name: name.into(),
            source_sets,
        }
    }

    /// Flavor names in declaration order: the base name split on `-` with
    /// the trailing build-type segment dropped.
    pub fn flavor_names(&self) -> Vec<String> {
        let segments: Vec<&str> = self.name.split('-').collect();
        segments[..segments.len() - 1]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// The build-type segment of the base name.
    pub fn build_type(&self) -> &str {
        self.name.rsplit('-').next().unwrap_or_default()
    }

    /// Classify a source-set name into its priority tier.
    pub fn tier_of(&self, source_set: &str) -> Tier {
        if source_set == MAIN_SOURCE_SET {
            Tier::Main
        } else if self.flavor_names().iter().any(|f| f == source_set) {
            Tier::Flavor
        } else if source_set == self.build_type() {
            Tier::BuildType
        } else {
            Tier::Combined
        }
    }
}

/// Priority tier of an overlay. The derived ordering only exists so tiers
/// can key sorted maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// The `main` source set.
    Main,
    /// A single product flavor. All flavors share this tier.
    Flavor,
    /// Flavor combinations and the full variant source set.
    Combined,
    /// The build type (`debug`, `release`, ...).
    BuildType,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Main => "main",
            Tier::Flavor => "flavor",
            Tier::Combined => "combined",
            Tier::BuildType => "build-type",
        };
        f.write_str(label)
    }
}

/// One overlay's contribution directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoot {
    /// Source-set name the root belongs to.
    pub name: String,
    /// Priority tier of the source set.
    pub tier: Tier,
    /// `<project>/src/<name>`.
    pub source_set_dir: PathBuf,
    /// `<project>/src/<name>/<play_path>`.
    pub path: PathBuf,
}

impl ResourceRoot {
    /// Whether `path` lies inside this root (the root itself excluded).
    pub fn contains(&self, path: &Path) -> bool {
        relative_to(path, &self.path).is_some()
    }
}

/// Maps files in any overlay root to their location in the merged tree.
#[derive(Debug, Clone)]
pub struct OverlayResolver {
    project_dir: PathBuf,
    play_path: String,
    variant: Variant,
    flavors: Vec<String>,
    roots: Vec<ResourceRoot>,
}

impl OverlayResolver {
    /// Build the root list for `variant`, one root per source set, in the
    /// variant's declaration order.
    pub fn new<P: Into<PathBuf>>(project_dir: P, play_path: &str, variant: Variant) -> Self {
        let project_dir = project_dir.into();
        let flavors = variant.flavor_names();
        let mut seen = BTreeSet::new();
        let roots = variant
            .source_sets
            .iter()
            .filter(|name| seen.insert(name.to_string()))
            .map(|name| {
                let source_set_dir = project_dir.join(SOURCE_DIR).join(name);
                ResourceRoot {
                    name: name.clone(),
                    tier: variant.tier_of(name),
                    path: source_set_dir.join(play_path),
                    source_set_dir,
                }
            })
            .collect();

        Self {
            project_dir,
            play_path: play_path.to_string(),
            variant,
            flavors,
            roots,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn play_path(&self) -> &str {
        &self.play_path
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Resource roots in priority order, lowest first.
    pub fn roots(&self) -> &[ResourceRoot] {
        &self.roots
    }

    /// Flavor names of the variant, in declaration order.
    pub fn flavor_names(&self) -> &[String] {
        &self.flavors
    }

    /// The unique root `path` is nested under.
    ///
    /// Roots are disjoint, so zero or several matches mean the caller handed
    /// in a path from outside this variant.
    pub fn owner(&self, path: &Path) -> Result<&ResourceRoot> {
        let mut matches = self.roots.iter().filter(|root| root.contains(path));
        match (matches.next(), matches.next()) {
            (Some(root), None) => Ok(root),
            (None, _) => Err(Error::NoOwningRoot {
                path: path.to_path_buf(),
                matches: 0,
            }),
            (Some(_), Some(_)) => Err(Error::NoOwningRoot {
                path: path.to_path_buf(),
                matches: 2 + matches.count(),
            }),
        }
    }

    /// Path of `path` relative to its owning root, which is also its path
    /// relative to the merged output directory.
    pub fn destination<'a>(&self, path: &'a Path) -> Result<&'a Path> {
        let root = self.owner(path)?;
        relative_to(path, &root.path).ok_or_else(|| Error::NoOwningRoot {
            path: path.to_path_buf(),
            matches: 0,
        })
    }

    /// Every file and directory currently present under an existing root,
    /// root by root in priority order, parents before children.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for root in self.roots.iter().filter(|root| root.path.is_dir()) {
            for entry in WalkDir::new(&root.path)
                .min_depth(1)
                .follow_links(false)
                .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            {
                found.push(entry?.into_path());
            }
        }
        Ok(found)
    }
}
