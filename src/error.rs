//! Error types for template cache generation.
//!
//! All failures surface through a single [`TemplateCacheError`] enum. Each
//! variant carries enough context to identify the failing stage and, for
//! per-file failures, the offending template path.
//!
//! A run is all-or-nothing: any per-file failure aborts the whole run before
//! output is written, and exactly one error is reported even when several
//! files fail (the first in discovery order).

use std::path::PathBuf;

use thiserror::Error;

/// The error type for all template cache generation failures.
#[derive(Error, Debug)]
pub enum TemplateCacheError {
    /// No usable configuration was supplied.
    ///
    /// Raised when [`Options`](crate::Options) has an empty root directory,
    /// which is what a defaulted configuration looks like. Generation never
    /// guesses a root.
    #[error("no configuration provided: a root directory is required")]
    ConfigurationMissing,

    /// Template discovery failed before any file was processed.
    ///
    /// Covers root canonicalization failures (missing or unreadable root)
    /// and errors raised while walking the directory tree. Discovery never
    /// returns partial results.
    #[error("template discovery failed under {root}")]
    Discovery {
        /// The root directory being scanned.
        root: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A discovered template file could not be read as UTF-8 text.
    #[error("failed to read template '{path}'")]
    Read {
        /// The template file that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user-supplied content transform failed for one file.
    ///
    /// The transform returned an error, failed its future, failed or dropped
    /// its completion handle, or panicked.
    #[error("content transform failed for template '{path}'")]
    Transform {
        /// The template the transform was processing.
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Minification produced output that is not valid UTF-8.
    #[error("failed to minify template '{path}'")]
    Minify {
        /// The template whose minified output was rejected.
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The generated module could not be persisted.
    ///
    /// Covers both parent directory creation and the file write itself.
    #[error("failed to write generated module to {path}")]
    Write {
        /// The resolved output path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
