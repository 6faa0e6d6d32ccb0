//! Concurrent statement aggregation.
//!
//! Fans the per-file pipeline out across one task per discovered template,
//! waits for every task to settle, and fans the results back in preserving
//! discovery order. The barrier never short-circuits: even when a file fails
//! early, the remaining tasks run to completion before the error is
//! reported, so a failed run leaves no work in flight. If several files
//! fail, the error of the first failing file in discovery order is the one
//! surfaced.

use futures::future::join_all;
use tracing::debug;

use crate::discovery::DiscoveredTemplate;
use crate::error::TemplateCacheError;
use crate::transform::{ContentTransform, render_statement};

/// Render registration statements for every template, concurrently.
///
/// Statements come back in the same order as `templates`; completion order
/// never matters because the join preserves spawn order. A panicking
/// transform is attributed to its file as a transform failure.
pub(crate) async fn collect_statements(
    templates: Vec<DiscoveredTemplate>,
    transform: Option<ContentTransform>,
) -> Result<Vec<String>, TemplateCacheError> {
    if templates.is_empty() {
        return Ok(Vec::new());
    }

    let paths: Vec<_> = templates.iter().map(|t| t.path.clone()).collect();
    debug!("Rendering {} templates concurrently", templates.len());

    let tasks: Vec<_> = templates
        .into_iter()
        .map(|template| {
            let transform = transform.clone();
            tokio::spawn(async move { render_statement(&template, transform.as_ref()).await })
        })
        .collect();

    // Wait for every task to settle; only then pick the first failure.
    let results = join_all(tasks).await;

    let mut statements = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (result, path) in results.into_iter().zip(paths) {
        match result {
            Ok(Ok(statement)) => statements.push(statement),
            Ok(Err(err)) => {
                first_error.get_or_insert(err);
            }
            // The task panicked; a panic inside a transform counts as that
            // file's transform failure.
            Err(join_err) => {
                first_error.get_or_insert(TemplateCacheError::Transform {
                    path,
                    source: anyhow::Error::new(join_err),
                });
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(statements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fixtures(dir: &TempDir, files: &[(&str, &str)]) -> Vec<DiscoveredTemplate> {
        files
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).unwrap();
                DiscoveredTemplate {
                    path,
                    key: (*name).to_string(),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn empty_input_yields_no_statements() {
        let statements = collect_statements(Vec::new(), None).await.unwrap();
        assert!(statements.is_empty());
    }

    #[tokio::test]
    async fn statements_follow_discovery_order() {
        let dir = TempDir::new().unwrap();
        let templates = fixtures(&dir, &[("a.html", "<p>a</p>"), ("b.html", "<p>b</p>")]);

        // Stall the first file so the second finishes well before it.
        let transform = ContentTransform::deferred(|content, path| {
            let slow = path.ends_with("a.html");
            Box::pin(async move {
                if slow {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                Ok(content)
            })
        });

        let statements = collect_statements(templates, Some(transform)).await.unwrap();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("\"a.html\""));
        assert!(statements[1].contains("\"b.html\""));
    }

    #[tokio::test]
    async fn first_failing_file_wins() {
        let dir = TempDir::new().unwrap();
        let templates = fixtures(
            &dir,
            &[
                ("a.html", "<p>a</p>"),
                ("b.html", "<p>b</p>"),
                ("c.html", "<p>c</p>"),
            ],
        );

        // b fails fast, c fails slow: the reported error must still be b's.
        let transform = ContentTransform::deferred(|content, path: &Path| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            Box::pin(async move {
                match name.as_str() {
                    "b.html" => anyhow::bail!("b failed"),
                    "c.html" => {
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        anyhow::bail!("c failed");
                    }
                    _ => Ok(content),
                }
            })
        });

        let err = collect_statements(templates, Some(transform)).await.unwrap_err();
        match err {
            TemplateCacheError::Transform { path, source } => {
                assert!(path.ends_with("b.html"));
                assert!(source.to_string().contains("b failed"));
            }
            other => panic!("expected transform error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_transform_is_attributed_to_its_file() {
        let dir = TempDir::new().unwrap();
        let templates = fixtures(&dir, &[("ok.html", "<p>x</p>"), ("panics.html", "<p>y</p>")]);

        let transform = ContentTransform::sync(|content, path| {
            assert!(!path.ends_with("panics.html"), "transform blew up");
            Ok(content)
        });

        let err = collect_statements(templates, Some(transform)).await.unwrap_err();
        match err {
            TemplateCacheError::Transform { path, .. } => assert!(path.ends_with("panics.html")),
            other => panic!("expected transform error, got {other:?}"),
        }
    }
}
