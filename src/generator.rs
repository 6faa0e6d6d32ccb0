//! Run orchestration.
//!
//! [`generate`] drives one complete run: validate the configuration,
//! canonicalize the root, discover templates, render their registration
//! statements concurrently, wrap them into the module text, and optionally
//! persist it. Runs share no mutable state, so any number of them can
//! execute concurrently from one process.

use tracing::{debug, info};

use crate::aggregate::collect_statements;
use crate::discovery::{discover_templates, resolve_root};
use crate::emit::{render_module, resolve_output_path, write_module};
use crate::error::TemplateCacheError;
use crate::options::Options;

/// Generate the template cache module described by `options`.
///
/// Returns the generated module text; when `write_output` is set the text is
/// also written to the resolved output path. No output is written for a
/// failed run.
///
/// # Errors
///
/// Fails with [`TemplateCacheError::ConfigurationMissing`] for an empty
/// configuration, and otherwise with the first error raised by discovery,
/// any per-file pipeline, or the output write.
///
/// # Examples
///
/// ```no_run
/// use ng_templatecache::{Options, generate};
///
/// # async fn example() -> Result<(), ng_templatecache::TemplateCacheError> {
/// let module = generate(&Options::new("app/src").with_module_name("app.templates")).await?;
/// assert!(module.starts_with("angular.module(\"app.templates\")"));
/// # Ok(())
/// # }
/// ```
pub async fn generate(options: &Options) -> Result<String, TemplateCacheError> {
    options.validate()?;
    debug!("Starting template cache run: {options:?}");

    let root = resolve_root(&options.root)?;
    let templates = discover_templates(&root, options.filter.as_ref())?;
    let count = templates.len();
    let statements = collect_statements(templates, options.transform.clone()).await?;
    let module = render_module(options, &statements);

    if options.write_output {
        let cwd = std::env::current_dir().map_err(|e| TemplateCacheError::Write {
            path: options.output_file.clone(),
            source: e,
        })?;
        let target = resolve_output_path(&root, &options.output_file, &cwd);
        write_module(&target, &module).await?;
    }

    info!("Registered {count} templates into module \"{}\"", options.module_name);
    Ok(module)
}

/// [`generate`], additionally delivering the outcome to `callback`.
///
/// The callback observes exactly the same single outcome as the returned
/// value - both channels fire once, for success or failure alike. Useful
/// when the caller integrates with completion-callback style build tooling.
pub async fn generate_with<F>(
    options: &Options,
    callback: F,
) -> Result<String, TemplateCacheError>
where
    F: FnOnce(Result<&str, &TemplateCacheError>),
{
    let result = generate(options).await;
    match &result {
        Ok(module) => callback(Ok(module.as_str())),
        Err(err) => callback(Err(err)),
    }
    result
}
