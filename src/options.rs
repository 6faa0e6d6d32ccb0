//! Run configuration.
//!
//! An [`Options`] value describes one generation run. Only the root
//! directory is required; every other field has a default matching the
//! conventional AngularJS template bundle (`templates` module, `templates.js`
//! output, plain run block, keep every file, no content transform).
//!
//! ```no_run
//! use ng_templatecache::{Options, RunBlockStyle};
//!
//! let options = Options::new("app/src")
//!     .with_module_name("app.templates")
//!     .standalone(true)
//!     .with_style(RunBlockStyle::Annotated)
//!     .with_filter(|path| !path.to_string_lossy().contains("partials/draft"));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::emit::RunBlockStyle;
use crate::error::TemplateCacheError;
use crate::transform::ContentTransform;

/// Module name used when none is configured.
pub const DEFAULT_MODULE: &str = "templates";

/// Output file name used when none is configured.
pub const DEFAULT_OUTPUT: &str = "templates.js";

/// Predicate deciding whether a discovered template is kept.
///
/// Receives the absolute path of the candidate file; returning `false` skips
/// it. Shared across per-file tasks, so it must be `Send + Sync`.
pub type FilterFn = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Configuration for one generation run.
///
/// Immutable once handed to [`generate`](crate::generate); clone it to vary
/// a field between runs. Concurrent runs never share mutable state, so the
/// same `Options` can drive several runs at once.
#[derive(Clone)]
pub struct Options {
    /// Root directory scanned for templates. Required.
    pub root: PathBuf,
    /// Name of the generated AngularJS module.
    pub module_name: String,
    /// Declare the module with an explicit empty dependency array.
    pub standalone: bool,
    /// Output location for the generated module (see crate docs for the
    /// resolution rules).
    pub output_file: PathBuf,
    /// Write the generated module to disk in addition to returning it.
    pub write_output: bool,
    /// Run-block emission style.
    pub style: RunBlockStyle,
    /// Per-file keep/skip predicate; `None` keeps everything.
    pub filter: Option<FilterFn>,
    /// Per-file content transform; `None` passes content through unchanged.
    pub transform: Option<ContentTransform>,
}

impl Options {
    /// Create options rooted at `root`, with defaults for everything else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the generated module name.
    #[must_use]
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Declare the module standalone (explicit empty dependency array).
    #[must_use]
    pub fn standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set the output path and enable writing it to disk.
    #[must_use]
    pub fn write_to(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = output_file.into();
        self.write_output = true;
        self
    }

    /// Select the run-block emission style.
    #[must_use]
    pub fn with_style(mut self, style: RunBlockStyle) -> Self {
        self.style = style;
        self
    }

    /// Install a keep/skip predicate over absolute template paths.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Install a per-file content transform.
    #[must_use]
    pub fn with_transform(mut self, transform: ContentTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Reject configurations that cannot drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateCacheError::ConfigurationMissing`] when the root
    /// directory is unset.
    pub(crate) fn validate(&self) -> Result<(), TemplateCacheError> {
        if self.root.as_os_str().is_empty() {
            return Err(TemplateCacheError::ConfigurationMissing);
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            module_name: DEFAULT_MODULE.to_string(),
            standalone: false,
            output_file: PathBuf::from(DEFAULT_OUTPUT),
            write_output: false,
            style: RunBlockStyle::default(),
            filter: None,
            transform: None,
        }
    }
}

// Closures have no useful Debug form; show whether they are set.
impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("root", &self.root)
            .field("module_name", &self.module_name)
            .field("standalone", &self.standalone)
            .field("output_file", &self.output_file)
            .field("write_output", &self.write_output)
            .field("style", &self.style)
            .field("filter", &self.filter.as_ref().map(|_| "<filter>"))
            .field("transform", &self.transform)
            .finish()
    }
}
