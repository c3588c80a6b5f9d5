//! # Sync Engine
//!
//! Applies one [`ChangeFeed`] to the merged output directory.
//!
//! ## Process
//!
//! 1.  **Reset**: on a non-incremental pass, everything currently in the
//!     output directory is deleted first.
//!
//! 2.  **Changed paths**: each added or modified source path is validated,
//!     mapped to `<output>/<path relative to its root>` and copied there
//!     (directories are mirrored as empty directories).
//!
//! 3.  **Removed paths**: each removed source path is mapped the same way and
//!     its destination deleted. A destination that is already gone is not an
//!     error.
//!
//! The pass stops at the first failure. Files copied earlier in the same
//! pass stay in place; there is no rollback. Unchanged files are never
//! touched, since the engine works purely from the feed.
//!
//! Passes must not run concurrently against the same output directory.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::changes::ChangeFeed;
use crate::error::Result;
use crate::filesystem::{DiskTransfer, Transfer};
use crate::overlay::OverlayResolver;
use crate::validate::Validator;

/// Where the engine is in a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Resetting,
    ProcessingChanges,
}

/// What one pass did to the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether the output directory was cleared first.
    pub full: bool,
    /// Destinations written, in order.
    pub copied: Vec<PathBuf>,
    /// Destinations deleted, in order. Removals whose destination was
    /// already absent are not listed.
    pub deleted: Vec<PathBuf>,
}

impl SyncReport {
    /// Whether the pass left the output directory untouched.
    pub fn is_noop(&self) -> bool {
        !self.full && self.copied.is_empty() && self.deleted.is_empty()
    }
}

/// Incrementally mirrors overlay roots into one output directory.
pub struct SyncEngine<T: Transfer = DiskTransfer> {
    resolver: OverlayResolver,
    output_root: PathBuf,
    transfer: T,
    state: SyncState,
}

impl SyncEngine<DiskTransfer> {
    /// Engine writing to disk through [`DiskTransfer`].
    pub fn on_disk<P: Into<PathBuf>>(resolver: OverlayResolver, output_root: P) -> Self {
        Self::new(resolver, output_root, DiskTransfer::new())
    }
}

impl<T: Transfer> SyncEngine<T> {
    pub fn new<P: Into<PathBuf>>(resolver: OverlayResolver, output_root: P, transfer: T) -> Self {
        Self {
            resolver,
            output_root: output_root.into(),
            transfer,
            state: SyncState::Idle,
        }
    }

    pub fn resolver(&self) -> &OverlayResolver {
        &self.resolver
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    /// Destination of `source` inside the output directory.
    pub fn destination_of(&self, source: &Path) -> Result<PathBuf> {
        Ok(self.output_root.join(self.resolver.destination(source)?))
    }

    /// Run one pass. The engine is back in [`SyncState::Idle`] afterwards,
    /// whether the pass succeeded or not.
    pub fn run(&mut self, feed: &ChangeFeed) -> Result<SyncReport> {
        let result = self.run_pass(feed);
        self.state = SyncState::Idle;
        result
    }

    fn run_pass(&mut self, feed: &ChangeFeed) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        if !feed.incremental {
            self.state = SyncState::Resetting;
            debug!("Clearing output directory {}", self.output_root.display());
            self.transfer.clear_dir(&self.output_root)?;
            self.transfer.create_dir(&self.output_root)?;
            report.full = true;
        }

        self.state = SyncState::ProcessingChanges;
        let mut validator = Validator::new(&self.resolver);

        for source in &feed.changed {
            validator.validate(source)?;
            let destination = self.output_root.join(self.resolver.destination(source)?);
            if source.is_dir() {
                debug!("Mirroring directory {}", destination.display());
                self.transfer.create_dir(&destination)?;
            } else {
                debug!("Copying {} -> {}", source.display(), destination.display());
                self.transfer.copy_file(source, &destination)?;
                report.copied.push(destination);
            }
        }

        for source in &feed.removed {
            let destination = self.output_root.join(self.resolver.destination(source)?);
            if self.transfer.remove(&destination)? {
                debug!("Deleted {}", destination.display());
                report.deleted.push(destination);
            } else {
                debug!("Nothing to delete at {}", destination.display());
            }
        }

        info!(
            "{} sync of {} finished: {} copied, {} deleted",
            if report.full { "Full" } else { "Incremental" },
            self.resolver.variant().name,
            report.copied.len(),
            report.deleted.len()
        );
        Ok(report)
    }
}
