//! Path classification utilities for play-resources
//!
//! Everything here is pure and total: nothing touches the filesystem or
//! allocates. Paths are compared component by component, so `listings-old`
//! never matches `listings`.

use std::path::{Component, Path};

/// Climb from `path` (inclusive) towards the filesystem root and return the
/// nearest ancestor whose final component is exactly `name`.
///
/// Returns a borrowed prefix of `path`, or `None` when no such ancestor
/// exists.
pub fn climb_up_to<'a>(path: &'a Path, name: &str) -> Option<&'a Path> {
    path.ancestors()
        .find(|ancestor| ancestor.file_name().is_some_and(|n| n == name))
}

/// Whether `path` has an ancestor (or is itself) named `name`.
pub fn is_child_of(path: &Path, name: &str) -> bool {
    climb_up_to(path, name).is_some()
}

/// Whether `path` sits immediately inside `dir`.
pub fn is_direct_child_of(path: &Path, dir: &Path) -> bool {
    path.parent().is_some_and(|parent| parent == dir)
}

/// Strip `root` from `path`, returning `None` when `path` is not nested
/// under `root` or is `root` itself.
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> Option<&'a Path> {
    path.strip_prefix(root)
        .ok()
        .filter(|rel| rel.components().next().is_some())
}

/// Number of normal components in a relative path.
pub fn depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}
