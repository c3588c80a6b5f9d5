//! # Play Resources Library
//!
//! This library validates the Play Store metadata contributed by the source
//! sets of a build variant (store listings, release notes, in-app products)
//! and incrementally synchronizes the resolved set into a single merged
//! directory consumed by a publishing step.
//!
//! ## Quick Example
//!
//! ```no_run
//! use play_resources::changes::{ChangeFeed, Snapshot};
//! use play_resources::config;
//!
//! // Relative paths in the file are resolved on load, so the resolver's
//! // roots are absolute even for a bare file name.
//! let config = config::from_file("play-resources.yaml").unwrap();
//! let resolver = config.resolver();
//! let mut engine = config.engine();
//!
//! // First pass: everything is new, the output directory is cleared first.
//! let before = Snapshot::capture(&resolver).unwrap();
//! engine.run(&before.diff(None, &resolver)).unwrap();
//!
//! // Later passes only touch what changed.
//! let after = Snapshot::capture(&resolver).unwrap();
//! let report = engine.run(&after.diff(Some(&before), &resolver)).unwrap();
//! println!("{} copied, {} deleted", report.copied.len(), report.deleted.len());
//! ```
//!
//! ## Core Concepts
//!
//! - **Overlays (`overlay`)**: each source set of the variant (`main`, the
//!   flavors, the build type, ...) contributes a resource root at
//!   `src/<name>/play`. The resolver owns those roots and maps any file in
//!   one of them to its relative path in the merged tree.
//! - **Validation (`validate`, `duplicates`)**: every file must sit where the
//!   Play layout expects it (`listings/<locale>/`, `release-notes/<locale>/`,
//!   `products/*.json`, or directly under the root), and sibling flavors may
//!   not contribute the same file.
//! - **Change feed (`changes`)**: which source paths changed or disappeared
//!   since the last pass. [`changes::Snapshot`] computes one for hosts that
//!   have no change detection of their own.
//! - **Sync (`sync`, `filesystem`)**: applies a feed to the output directory
//!   through a pluggable copy/delete primitive.
//!
//! Failures are reported through [`error::Error`] and abort the pass; the
//! host is expected to show the message and fail its build step.

pub mod changes;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod filesystem;
pub mod locale;
pub mod overlay;
pub mod path;
pub mod sync;
pub mod validate;

#[cfg(test)]
mod path_proptest;
