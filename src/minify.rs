//! Markup minification.
//!
//! Thin wrapper around `minify-html` with a fixed configuration suited to
//! AngularJS template fragments: comments and redundant whitespace are
//! stripped, attribute quotes are removed where safe, `{{ }}` interpolation
//! is left untouched, and closing tags are kept so directive-heavy markup
//! keeps its structure.

use std::string::FromUtf8Error;

fn cfg() -> minify_html::Cfg {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.preserve_brace_template_syntax = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    cfg
}

/// Minify a template fragment.
///
/// # Errors
///
/// Returns an error if the minifier's byte output is not valid UTF-8.
pub fn minify_markup(content: &str) -> Result<String, FromUtf8Error> {
    let minified = minify_html::minify(content.as_bytes(), &cfg());
    String::from_utf8(minified)
}
