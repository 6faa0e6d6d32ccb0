//! ng-templatecache - bundle AngularJS view templates into a preloaded
//! `$templateCache` module.
//!
//! Front-end builds that ship AngularJS views as separate `.html` files pay
//! one network round trip per view. This crate walks a root directory,
//! minifies every template it finds, and emits a single JavaScript module
//! that registers each template into `$templateCache` keyed by its
//! root-relative path - so the running application resolves views from
//! memory instead of the network.
//!
//! # Overview
//!
//! A run flows through four stages:
//!
//! 1. **Discovery** - walk the root, collect every `*.html` file (minus the
//!    reserved root-level `index.html` and anything the filter predicate
//!    rejects), keyed by root-relative path in stable lexical order.
//! 2. **Transform** - per file: read, apply the optional user transform,
//!    minify, and escape into a single-line
//!    `$templateCache.put("key","content");` statement. Files are processed
//!    concurrently, one task each.
//! 3. **Aggregation** - wait for every file to settle; keep statements in
//!    discovery order; fail the run with the first failing file's error.
//! 4. **Emission** - wrap the statements in the module header and run block
//!    and, if requested, write the result to disk (creating directories as
//!    needed). The generated text is always returned.
//!
//! # Example
//!
//! ```no_run
//! use ng_templatecache::{ContentTransform, Options, RunBlockStyle, generate};
//!
//! # async fn example() -> Result<(), ng_templatecache::TemplateCacheError> {
//! let options = Options::new("app/src")
//!     .with_module_name("app.templates")
//!     .standalone(true)
//!     .with_style(RunBlockStyle::Annotated)
//!     .with_transform(ContentTransform::sync(|content, _path| {
//!         Ok(content.replace("@@version", "1.4.2"))
//!     }))
//!     .write_to("dist/templates.js");
//!
//! let module = generate(&options).await?;
//! assert!(module.starts_with("angular.module(\"app.templates\",[])"));
//! # Ok(())
//! # }
//! ```
//!
//! # Output path resolution
//!
//! Absolute output paths are used verbatim; paths starting with `./` resolve
//! against the process working directory; all other relative paths resolve
//! against the template root.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber; hosts that
//! want build diagnostics configure their own.

mod aggregate;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod generator;
pub mod minify;
pub mod options;
pub mod transform;

pub use discovery::DiscoveredTemplate;
pub use emit::RunBlockStyle;
pub use error::TemplateCacheError;
pub use generator::{generate, generate_with};
pub use options::{DEFAULT_MODULE, DEFAULT_OUTPUT, FilterFn, Options};
pub use transform::{
    CallbackTransformFn, Completion, ContentTransform, DeferredTransformFn, SyncTransformFn,
};
