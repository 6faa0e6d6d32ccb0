//! Per-file content transformation.
//!
//! Callers can reshape template content before it is minified and
//! registered, using whichever of three calling conventions fits their code:
//! a plain synchronous function, a future-returning function, or a function
//! that is handed a one-shot [`Completion`] handle to resolve later (from a
//! spawned task, a channel consumer, wherever). All three are adapters over
//! the same internal contract - an asynchronous
//! `transform(content, path) -> Result<String>` - so the pipeline itself
//! never branches on the calling convention.
//!
//! ```no_run
//! use ng_templatecache::ContentTransform;
//!
//! // Synchronous:
//! let sync = ContentTransform::sync(|content, _path| Ok(content.to_uppercase()));
//!
//! // Future-returning:
//! let deferred = ContentTransform::deferred(|content, _path| {
//!     Box::pin(async move { Ok(content.replace("v1/", "v2/")) })
//! });
//!
//! // Completion-handle:
//! let callback = ContentTransform::callback(|content, _path, done| {
//!     tokio::spawn(async move { done.resolve(content) });
//! });
//! ```
//!
//! This module also hosts the per-file pipeline: read the template, apply
//! the transform, minify, escape, and render the single-line
//! `$templateCache.put(...)` registration statement.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::trace;

use crate::discovery::DiscoveredTemplate;
use crate::error::TemplateCacheError;
use crate::minify::minify_markup;

/// Synchronous transform: `(content, path) -> Result<content>`.
pub type SyncTransformFn = Arc<dyn Fn(String, &Path) -> anyhow::Result<String> + Send + Sync>;

/// Future-returning transform: `(content, path) -> future of Result<content>`.
pub type DeferredTransformFn =
    Arc<dyn Fn(String, &Path) -> BoxFuture<'static, anyhow::Result<String>> + Send + Sync>;

/// Completion-handle transform: `(content, path, completion)`.
pub type CallbackTransformFn = Arc<dyn Fn(String, &Path, Completion) + Send + Sync>;

/// One-shot handle through which a callback-style transform delivers its
/// result.
///
/// Consumed by [`resolve`](Completion::resolve) or [`fail`](Completion::fail);
/// the handle is `Send`, so it can be moved into a spawned task and completed
/// asynchronously. Dropping it without calling either method fails the file's
/// pipeline.
pub struct Completion {
    tx: oneshot::Sender<anyhow::Result<String>>,
}

impl Completion {
    /// Deliver the transformed content.
    pub fn resolve(self, content: impl Into<String>) {
        let _ = self.tx.send(Ok(content.into()));
    }

    /// Fail this file's pipeline.
    pub fn fail(self, error: impl Into<anyhow::Error>) {
        let _ = self.tx.send(Err(error.into()));
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// A user-supplied content transform in one of three calling conventions.
///
/// Cheap to clone; the underlying function is shared across the per-file
/// tasks of a run.
#[derive(Clone)]
pub enum ContentTransform {
    /// Returns the transformed content directly.
    Sync(SyncTransformFn),
    /// Returns a future resolving to the transformed content.
    Deferred(DeferredTransformFn),
    /// Receives a [`Completion`] handle and resolves it, possibly from
    /// another task.
    Callback(CallbackTransformFn),
}

impl ContentTransform {
    /// Wrap a synchronous transform function.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(String, &Path) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wrap a transform returning a boxed future.
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(String, &Path) -> BoxFuture<'static, anyhow::Result<String>> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(f))
    }

    /// Wrap a completion-handle transform.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(String, &Path, Completion) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Run the transform under the unified asynchronous contract.
    pub(crate) async fn apply(&self, content: String, path: &Path) -> anyhow::Result<String> {
        match self {
            Self::Sync(f) => f(content, path),
            Self::Deferred(f) => f(content, path).await,
            Self::Callback(f) => {
                let (tx, rx) = oneshot::channel();
                f(content, path, Completion { tx });
                rx.await
                    .context("transform dropped its completion handle without calling it")?
            }
        }
    }
}

impl fmt::Debug for ContentTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Sync(_) => "Sync",
            Self::Deferred(_) => "Deferred",
            Self::Callback(_) => "Callback",
        };
        f.write_str(kind)
    }
}

/// Run the full per-file pipeline for one discovered template.
///
/// Reads the file, applies the transform (if any), minifies, escapes, and
/// renders the registration statement. Each failure names the offending
/// file.
pub(crate) async fn render_statement(
    template: &DiscoveredTemplate,
    transform: Option<&ContentTransform>,
) -> Result<String, TemplateCacheError> {
    let content =
        tokio::fs::read_to_string(&template.path)
            .await
            .map_err(|e| TemplateCacheError::Read {
                path: template.path.clone(),
                source: e,
            })?;

    let content = match transform {
        Some(transform) => transform.apply(content, &template.path).await.map_err(|e| {
            TemplateCacheError::Transform {
                path: template.path.clone(),
                source: e,
            }
        })?,
        None => content,
    };

    let minified = minify_markup(&content).map_err(|e| TemplateCacheError::Minify {
        path: template.path.clone(),
        source: e,
    })?;

    // Statements concatenate with no separator, so the body must be a single
    // line with inner quotes escaped.
    let body = minified.replace('"', "\\\"").replace(['\r', '\n'], "");

    trace!("Rendered registration for {}", template.key);
    Ok(format!("$templateCache.put(\"{}\",\"{}\");", template.key, body))
}
