//! # Resource Validation
//!
//! Every file entering the merged tree is checked against the fixed layout
//! of a Play resource root:
//!
//! ```text
//! <root>/
//!   listings/<locale>/...        Category::Listing
//!   release-notes/<locale>/...   Category::ReleaseNotes
//!   products/<sku>.json          Category::Product
//!   <anything>                   Category::Generic (direct children only)
//! ```
//!
//! A path is classified once, by the nearest ancestor (itself included)
//! named after a category root, and then checked by that category's rule.
//! File contents are never parsed.
//!
//! Files in a flavor-tier overlay are additionally checked against every
//! sibling flavor: two flavors of identical priority may not both provide the
//! same relative path.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateIndex;
use crate::error::{Error, Result};
use crate::locale::is_known_locale;
use crate::overlay::{OverlayResolver, ResourceRoot, Tier};
use crate::path::{climb_up_to, depth, is_direct_child_of, relative_to};

/// Directory name of the listings category root.
pub const LISTINGS_PATH: &str = "listings";
/// Directory name of the release-notes category root.
pub const RELEASE_NOTES_PATH: &str = "release-notes";
/// Directory name of the in-app products category root.
pub const PRODUCTS_PATH: &str = "products";

/// Extension every in-app product definition must carry.
pub const PRODUCT_EXTENSION: &str = "json";

/// The kind of resource a path represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Listing,
    ReleaseNotes,
    Product,
    /// A loose file directly under the resource root.
    Generic,
}

impl Category {
    /// Categories that own a dedicated root directory.
    pub const ROOTED: [Category; 3] = [
        Category::Listing,
        Category::ReleaseNotes,
        Category::Product,
    ];

    /// Directory name of this category's root, if it has one.
    pub fn dir_name(self) -> Option<&'static str> {
        match self {
            Category::Listing => Some(LISTINGS_PATH),
            Category::ReleaseNotes => Some(RELEASE_NOTES_PATH),
            Category::Product => Some(PRODUCTS_PATH),
            Category::Generic => None,
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Category::Listing => "Listings",
            Category::ReleaseNotes => "Release notes",
            Category::Product => "Products",
            Category::Generic => "Resource",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying a path relative to its resource root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub category: Category,
    /// The category root, relative to the resource root. `None` for
    /// `Category::Generic`.
    pub category_root: Option<&'a Path>,
}

/// Classify `relative` (a path relative to its resource root).
///
/// Returns `None` for paths that are neither inside a category root nor a
/// direct child of the resource root.
pub fn classify(relative: &Path) -> Option<Classification<'_>> {
    let nearest = Category::ROOTED
        .iter()
        .filter_map(|&category| {
            let name = category.dir_name()?;
            climb_up_to(relative, name).map(|dir| (category, dir))
        })
        .max_by_key(|(_, dir)| depth(dir));

    match nearest {
        Some((category, dir)) => Some(Classification {
            category,
            category_root: Some(dir),
        }),
        None if depth(relative) == 1 => Some(Classification {
            category: Category::Generic,
            category_root: None,
        }),
        None => None,
    }
}

/// Whether `path` is accepted as an in-app product definition.
pub fn is_product_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == PRODUCT_EXTENSION)
}

/// Validates candidate files for one pass.
///
/// A validator lives for a single pass: category roots it has already
/// listed and the flavor duplicate index are cached, and both assume the
/// source roots do not change while the pass runs.
pub struct Validator<'r> {
    resolver: &'r OverlayResolver,
    checked_roots: HashSet<PathBuf>,
    duplicates: Option<DuplicateIndex>,
}

impl<'r> Validator<'r> {
    pub fn new(resolver: &'r OverlayResolver) -> Self {
        Self {
            resolver,
            checked_roots: HashSet::new(),
            duplicates: None,
        }
    }

    /// Use a prebuilt duplicate index instead of walking the flavor roots.
    pub fn with_duplicates(mut self, index: DuplicateIndex) -> Self {
        self.duplicates = Some(index);
        self
    }

    /// Check `file` and return its category.
    pub fn validate(&mut self, file: &Path) -> Result<Category> {
        let resolver = self.resolver;
        let root = resolver.owner(file)?;
        let relative = relative_to(file, &root.path).ok_or_else(|| Error::UnknownFile {
            path: file.to_path_buf(),
        })?;
        let classification = classify(relative).ok_or_else(|| Error::UnknownFile {
            path: file.to_path_buf(),
        })?;

        if let Some(dir) = classification.category_root {
            let category_root = root.path.join(dir);
            self.check_category_root(classification.category, root, &category_root)?;
        }

        if root.tier == Tier::Flavor && !file.is_dir() {
            self.check_duplicates(root, file)?;
        }

        Ok(classification.category)
    }

    fn check_category_root(
        &mut self,
        category: Category,
        root: &ResourceRoot,
        category_root: &Path,
    ) -> Result<()> {
        if !is_direct_child_of(category_root, &root.path) {
            return Err(Error::MisplacedCategoryRoot {
                category,
                path: category_root.to_path_buf(),
                play_path: self.resolver.play_path().to_string(),
            });
        }
        if self.checked_roots.contains(category_root) {
            return Ok(());
        }

        let children = list_children(category_root)?;
        match category {
            Category::Listing | Category::ReleaseNotes => {
                for child in &children {
                    let name = file_name(child);
                    if !(child.is_dir() && is_known_locale(&name)) {
                        return Err(Error::InvalidLocale {
                            name,
                            path: category_root.to_path_buf(),
                        });
                    }
                }
            }
            Category::Product => {
                if let Some(child) = children.iter().find(|child| !is_product_file(child)) {
                    return Err(Error::InvalidProductFile {
                        name: file_name(child),
                    });
                }
            }
            Category::Generic => {}
        }

        self.checked_roots.insert(category_root.to_path_buf());
        Ok(())
    }

    fn check_duplicates(&mut self, root: &ResourceRoot, file: &Path) -> Result<()> {
        let index = match self.duplicates.take() {
            Some(index) => index,
            None => DuplicateIndex::build(self.resolver)?,
        };
        let conflict = index.conflict_for(root, file).map(str::to_string);
        self.duplicates = Some(index);

        match conflict {
            Some(flavor) => Err(Error::DuplicateFlavorFile {
                path: file.to_path_buf(),
                flavor,
            }),
            None => Ok(()),
        }
    }
}

/// Immediate children of `dir`, sorted by name.
fn list_children(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotAFolder {
            path: dir.to_path_buf(),
        });
    }
    let mut children = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    children.sort();
    Ok(children)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
