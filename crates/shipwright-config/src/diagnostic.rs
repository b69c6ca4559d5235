// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Turns Figment extraction errors into miette diagnostics. Unknown keys and
//! unknown enum values (a misspelled capability kind, say) get a "did you
//! mean?" hint computed with Jaro-Winkler similarity, and a source span when
//! the offending TOML file can be located.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches typos like `patern` -> `pattern` or `deployr` -> `deployer`
/// while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key not present in the configuration model.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(shipwright::config::unknown_key),
        help("{}", format_help(suggestion.as_deref(), "valid keys", allowed))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys accepted in the same section.
        allowed: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not fit the key's type or enumeration.
    #[error("invalid value for `{key}`: {detail}")]
    #[diagnostic(
        code(shipwright::config::invalid_value),
        help("{}", format_help(suggestion.as_deref(), "expected", expected))
    )]
    InvalidValue {
        key: String,
        detail: String,
        suggestion: Option<String>,
        expected: String,
    },

    /// A required key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(shipwright::config::missing_key),
        help("add `{key} = <value>` to your shipwright.toml")
    )]
    MissingKey { key: String },

    /// A semantic validation failure found after deserialization.
    #[error("validation error: {message}")]
    #[diagnostic(code(shipwright::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(shipwright::config::other))]
    Other(String),
}

fn format_help(suggestion: Option<&str>, what: &str, allowed: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? {what}: {allowed}"),
        None => format!("{what}: {allowed}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs a file path with its content and is used to attach
/// source spans to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let key = dotted_path(&error.path);
            match &error.kind {
                Kind::UnknownField(field, allowed) => {
                    let (span, src) = locate_key(&error, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, allowed),
                        allowed: allowed.join(", "),
                        span,
                        src,
                    }
                }
                Kind::UnknownVariant(actual, allowed) => ConfigError::InvalidValue {
                    key,
                    detail: format!("unknown value `{actual}`"),
                    suggestion: suggest_key(actual, allowed),
                    expected: allowed.join(", "),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidValue {
                    key,
                    detail: format!("found {actual}"),
                    suggestion: None,
                    expected: expected.to_string(),
                },
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn dotted_path(path: &[String]) -> String {
    path.join(".")
}

/// Resolve the file an error came from and the byte span of `field` in it.
fn locate_key(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(file)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let file = file.display().to_string();

    let Some((name, content)) = toml_sources.iter().find(|(p, _)| *p == file) else {
        return (None, None);
    };

    match find_key_offset(content, &error.path, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` at the start of a line inside the section named by
/// `path[0]` (or anywhere, for top-level keys).
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        if let Some(after) = rest.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Suggest the closest allowed key, or `None` if nothing is similar enough.
pub fn suggest_key(unknown: &str, allowed: &[&str]) -> Option<String> {
    allowed
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_pattern_for_patern() {
        let valid = &["directory", "pattern", "kinds", "identifier", "symbol", "concurrent"];
        assert_eq!(suggest_key("patern", valid), Some("pattern".to_string()));
    }

    #[test]
    fn suggest_kind_for_misspelled_variant() {
        let valid = &["generic", "deployer", "provider"];
        assert_eq!(suggest_key("deployr", valid), Some("deployer".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["directory", "pattern", "kinds"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[host]\nlog_level = \"info\"\n\n[discovery]\npatern = \"*.so\"\n";
        let path = vec!["discovery".to_string()];
        let o = find_key_offset(content, &path, "patern").unwrap();
        assert_eq!(&content[o..o + 6], "patern");
    }

    #[test]
    fn find_key_offset_ignores_longer_keys() {
        let content = "[discovery]\npattern_x = 1\npattern = \"*.so\"\n";
        let path = vec!["discovery".to_string()];
        let o = find_key_offset(content, &path, "pattern").unwrap();
        assert!(content[o..].starts_with("pattern = "));
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[host]\nlog_level = \"info\"\n";
        let path = vec!["discovery".to_string()];
        assert!(find_key_offset(content, &path, "pattern").is_none());
    }

    #[test]
    fn help_lists_suggestion() {
        assert_eq!(
            format_help(Some("pattern"), "valid keys", "directory, pattern"),
            "did you mean `pattern`? valid keys: directory, pattern"
        );
        assert_eq!(
            format_help(None, "expected", "a string"),
            "expected: a string"
        );
    }
}
