//! # Error Handling
//!
//! This module defines the centralized error type for `play-resources`. It
//! uses the `thiserror` library to build a single `Error` enum covering every
//! failure mode of a sync pass, with messages meant to be shown verbatim to
//! the person running the build.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. The first group of variants are validation
//!   failures raised while checking a resource file's place in the tree; the
//!   rest cover resolver preconditions, configuration and I/O.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error aborts the current pass. Nothing in the crate retries or
//! swallows an `Error`; benign conditions (such as deleting a destination
//! that is already gone) are not modelled as errors at all.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Category;

/// Main error type for play-resources operations
#[derive(Error, Debug)]
pub enum Error {
    /// The file is neither inside a category root nor a direct child of its
    /// resource root.
    #[error("Unknown file: {}", path.display())]
    UnknownFile { path: PathBuf },

    /// A `listings`, `release-notes` or `products` directory was found nested
    /// deeper than directly under the resource root.
    #[error("{} ({}) must be under the '{play_path}' folder", category.label(), path.display())]
    MisplacedCategoryRoot {
        category: Category,
        path: PathBuf,
        play_path: String,
    },

    /// A child of a listings or release-notes root is not a directory named
    /// after a known locale.
    #[error("Invalid locale: {name} (in {})", path.display())]
    InvalidLocale { name: String, path: PathBuf },

    /// A category root exists but is not a directory.
    #[error("{} must be a folder", path.display())]
    NotAFolder { path: PathBuf },

    /// A child of the products root is not a `.json` file.
    #[error("In-app product files must be JSON: {name}")]
    InvalidProductFile { name: String },

    /// Two flavors of identical priority contribute the same relative path.
    #[error("File '{}' is duplicated in flavor {flavor} with identical priority", path.display())]
    DuplicateFlavorFile { path: PathBuf, flavor: String },

    /// A path was not nested under exactly one resource root.
    ///
    /// Roots are disjoint by construction, so this indicates the caller fed
    /// a path that does not belong to the variant being synced.
    #[error("Expected exactly one resource root to own {}, found {matches}", path.display())]
    NoOwningRoot { path: PathBuf, matches: usize },

    /// An error occurred while parsing or checking the YAML configuration.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A copy, delete or directory operation on the host filesystem failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Whether this error came from checking a resource file's structure,
    /// as opposed to configuration, precondition or I/O problems.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::UnknownFile { .. }
                | Error::MisplacedCategoryRoot { .. }
                | Error::InvalidLocale { .. }
                | Error::NotAFolder { .. }
                | Error::InvalidProductFile { .. }
                | Error::DuplicateFlavorFile { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
