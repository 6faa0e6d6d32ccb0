//! Template file discovery.
//!
//! Walks the root directory tree and collects every `*.html` file as a
//! [`DiscoveredTemplate`] pairing the absolute path with its cache key (the
//! path relative to the root, with forward-slash separators on every
//! platform). The root-level `index.html` is reserved for the host page and
//! never registered; an optional filter predicate can reject further files.
//!
//! Discovery is deterministic: results are sorted lexically by cache key, so
//! two runs over an unchanged tree see the same files in the same order.

use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::TemplateCacheError;
use crate::options::FilterFn;

/// File name pattern for template files.
const TEMPLATE_PATTERN: &str = "*.html";

/// Cache key reserved for the application's host page.
const RESERVED_INDEX: &str = "index.html";

/// A template file found under the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTemplate {
    /// Absolute path of the template file.
    pub path: PathBuf,
    /// Cache key: the path relative to the root, `/`-separated.
    pub key: String,
}

/// Canonicalize the root directory for a run.
///
/// # Errors
///
/// Returns [`TemplateCacheError::Discovery`] if the root does not exist or
/// cannot be resolved.
pub(crate) fn resolve_root(root: &Path) -> Result<PathBuf, TemplateCacheError> {
    root.canonicalize().map_err(|e| TemplateCacheError::Discovery {
        root: root.to_path_buf(),
        source: anyhow::Error::new(e).context("failed to canonicalize root directory"),
    })
}

/// Find every registrable template under `root`.
///
/// `root` must already be canonicalized (see [`resolve_root`]). The filter
/// predicate receives the absolute path of each candidate; files for which it
/// returns `false` are skipped. Any error raised while walking the tree fails
/// the whole discovery - no partial results are returned.
pub(crate) fn discover_templates(
    root: &Path,
    filter: Option<&FilterFn>,
) -> Result<Vec<DiscoveredTemplate>, TemplateCacheError> {
    let pattern = Pattern::new(TEMPLATE_PATTERN).map_err(|e| TemplateCacheError::Discovery {
        root: root.to_path_buf(),
        source: anyhow::Error::new(e).context("invalid template file pattern"),
    })?;

    debug!("Scanning {} for {} files", root.display(), TEMPLATE_PATTERN);

    let mut templates = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| TemplateCacheError::Discovery {
            root: root.to_path_buf(),
            source: anyhow::Error::new(e).context("directory walk failed"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !pattern.matches(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        let key = cache_key(root, path)?;
        trace!("Candidate template: {key}");

        // index.html is excluded by exact key match only; sub/index.html stays.
        if key == RESERVED_INDEX {
            debug!("Skipping reserved {RESERVED_INDEX}");
            continue;
        }
        if let Some(filter) = filter {
            if !filter(path) {
                trace!("Filtered out: {key}");
                continue;
            }
        }

        templates.push(DiscoveredTemplate {
            path: path.to_path_buf(),
            key,
        });
    }

    templates.sort_by(|a, b| a.key.cmp(&b.key));
    debug!("Discovered {} templates under {}", templates.len(), root.display());
    Ok(templates)
}

/// Compute the cache key for `path`: the root-relative path with components
/// joined by `/` regardless of platform separator.
fn cache_key(root: &Path, path: &Path) -> Result<String, TemplateCacheError> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("template {} escapes root", path.display()))
        .map_err(|e| TemplateCacheError::Discovery {
            root: root.to_path_buf(),
            source: e,
        })?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn make_tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "<p>x</p>").unwrap();
        }
        dir
    }

    #[test]
    fn finds_templates_recursively_in_key_order() {
        let dir = make_tree(&["views/b.html", "views/sub/c.html", "a.html"]);
        let root = dir.path().canonicalize().unwrap();

        let found = discover_templates(&root, None).unwrap();
        let keys: Vec<&str> = found.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["a.html", "views/b.html", "views/sub/c.html"]);
        assert!(found.iter().all(|t| t.path.is_absolute()));
    }

    #[test]
    fn ignores_non_template_files() {
        let dir = make_tree(&["app.js.html"]);
        fs::write(dir.path().join("app.js"), "angular.module('x',[]);").unwrap();
        fs::write(dir.path().join("readme.md"), "# hi").unwrap();
        let root = dir.path().canonicalize().unwrap();

        let found = discover_templates(&root, None).unwrap();
        let keys: Vec<&str> = found.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["app.js.html"]);
    }

    #[test]
    fn reserved_index_is_excluded_at_root_only() {
        let dir = make_tree(&["index.html", "admin/index.html"]);
        let root = dir.path().canonicalize().unwrap();

        let found = discover_templates(&root, None).unwrap();
        let keys: Vec<&str> = found.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["admin/index.html"]);
    }

    #[test]
    fn reserved_index_is_excluded_even_if_filter_accepts_it() {
        let dir = make_tree(&["index.html", "view.html"]);
        let root = dir.path().canonicalize().unwrap();

        let keep_all: FilterFn = Arc::new(|_: &Path| true);
        let found = discover_templates(&root, Some(&keep_all)).unwrap();
        let keys: Vec<&str> = found.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["view.html"]);
    }

    #[test]
    fn filter_receives_absolute_path_and_skips() {
        let dir = make_tree(&["keep.html", "drop.html"]);
        let root = dir.path().canonicalize().unwrap();

        let filter: FilterFn = Arc::new(|path: &Path| {
            assert!(path.is_absolute());
            !path.ends_with("drop.html")
        });
        let found = discover_templates(&root, Some(&filter)).unwrap();
        let keys: Vec<&str> = found.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["keep.html"]);
    }

    #[test]
    fn missing_root_fails_discovery() {
        let err = resolve_root(Path::new("/no/such/template/root")).unwrap_err();
        assert!(matches!(err, TemplateCacheError::Discovery { .. }));
    }

    #[test]
    fn keys_are_unique() {
        let dir = make_tree(&["a.html", "x/a.html", "x/y/a.html"]);
        let root = dir.path().canonicalize().unwrap();

        let found = discover_templates(&root, None).unwrap();
        let mut keys: Vec<&str> = found.iter().map(|t| t.key.as_str()).collect();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }
}
