//! Generated module emission.
//!
//! Renders the module text around the aggregated registration statements and
//! optionally persists it. The run block comes in two fixed literal pairs:
//! the plain form, and the annotated form for toolchains that strip
//! parameter names and need the injected service tagged explicitly.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TemplateCacheError;
use crate::options::Options;

const TPL_RUN: &str = ".run(function($templateCache){";
const TPL_RUN_ANNOTATED: &str = ".run([\"$templateCache\",function($templateCache){";
const TPL_FOOTER: &str = "});";
const TPL_FOOTER_ANNOTATED: &str = "}]);";

/// Emission style of the generated run block.
///
/// Each variant owns its open/close literal pair; the emitter never branches
/// on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunBlockStyle {
    /// `.run(function($templateCache){ ... });`
    #[default]
    Plain,
    /// `.run(["$templateCache",function($templateCache){ ... }]);` - the
    /// dependency-injection-annotated form, safe under minifiers that mangle
    /// parameter names.
    Annotated,
}

impl RunBlockStyle {
    fn open(self) -> &'static str {
        match self {
            Self::Plain => TPL_RUN,
            Self::Annotated => TPL_RUN_ANNOTATED,
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Plain => TPL_FOOTER,
            Self::Annotated => TPL_FOOTER_ANNOTATED,
        }
    }
}

/// Render the complete module: header, run-block open, statements with no
/// separator, run-block close.
pub(crate) fn render_module(options: &Options, statements: &[String]) -> String {
    let mut module = format!("angular.module(\"{}\"", options.module_name);
    if options.standalone {
        module.push_str(",[]");
    }
    module.push(')');
    module.push_str(options.style.open());
    for statement in statements {
        module.push_str(statement);
    }
    module.push_str(options.style.close());
    module
}

/// Resolve the configured output path.
///
/// Absolute paths are used as-is. Paths starting with `./` resolve against
/// the process working directory; every other relative path resolves against
/// the template root.
pub(crate) fn resolve_output_path(root: &Path, output_file: &Path, cwd: &Path) -> PathBuf {
    if output_file.is_absolute() {
        output_file.to_path_buf()
    } else if output_file.starts_with(".") {
        cwd.join(output_file)
    } else {
        root.join(output_file)
    }
}

/// Persist the generated module, creating parent directories as needed.
///
/// Directory creation is idempotent and tolerates another process creating
/// the chain concurrently (`create_dir_all` semantics). The target file is
/// truncated if it already exists.
pub(crate) async fn write_module(path: &Path, module: &str) -> Result<(), TemplateCacheError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| TemplateCacheError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    tokio::fs::write(path, module)
        .await
        .map_err(|e| TemplateCacheError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!("Wrote generated module to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_module_with_no_statements() {
        let options = Options::new("app");
        assert_eq!(
            render_module(&options, &[]),
            "angular.module(\"templates\").run(function($templateCache){});"
        );
    }

    #[test]
    fn standalone_header_declares_empty_dependencies() {
        let options = Options::new("app").with_module_name("app.tpl").standalone(true);
        let module = render_module(&options, &[]);
        assert!(module.starts_with("angular.module(\"app.tpl\",[])"));
    }

    #[test]
    fn annotated_style_uses_annotated_literals() {
        let options = Options::new("app").with_style(RunBlockStyle::Annotated);
        let module = render_module(&options, &[]);
        assert_eq!(
            module,
            "angular.module(\"templates\").run([\"$templateCache\",function($templateCache){}]);"
        );
    }

    #[test]
    fn statements_concatenate_without_separator() {
        let options = Options::new("app");
        let statements = vec!["A();".to_string(), "B();".to_string()];
        let module = render_module(&options, &statements);
        assert!(module.contains("A();B();"));
    }

    #[test]
    fn absolute_output_path_is_used_verbatim() {
        let resolved = resolve_output_path(
            Path::new("/root"),
            Path::new("/abs/out.js"),
            Path::new("/cwd"),
        );
        assert_eq!(resolved, PathBuf::from("/abs/out.js"));
    }

    #[test]
    fn dot_prefixed_output_path_resolves_from_cwd() {
        let resolved = resolve_output_path(
            Path::new("/root"),
            Path::new("./sub/out.js"),
            Path::new("/cwd"),
        );
        assert_eq!(resolved, PathBuf::from("/cwd/sub/out.js"));
    }

    #[test]
    fn bare_relative_output_path_resolves_from_root() {
        let resolved =
            resolve_output_path(Path::new("/root"), Path::new("out.js"), Path::new("/cwd"));
        assert_eq!(resolved, PathBuf::from("/root/out.js"));
    }

    #[tokio::test]
    async fn write_creates_missing_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("deep/nested/out.js");
        write_module(&target, "content").await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "content");
    }

    #[tokio::test]
    async fn write_truncates_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("out.js");
        std::fs::write(&target, "a much longer previous module body").unwrap();
        write_module(&target, "short").await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "short");
    }
}
