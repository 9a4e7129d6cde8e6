//! Pattern compilation — turning a URI template into a matcher.
//!
//! Ground: `src/router/core.rs::path_to_regex` in the teacher crate, which converts
//! `/users/{id}` into `^/users/([^/]+)$` plus an ordered parameter-name list. This module
//! generalizes that same idea to spec.md §4.1: named capture groups (so segments can be
//! looked up by name, not just position), per-segment constraint patterns supplied by
//! callers, and `{?name}` optional segments.

use crate::error::{RouterError, Result};
use regex::Regex;
use std::collections::HashMap;

/// Characters trimmed from a constraint's pattern before it is embedded in the compiled
/// regex, per spec.md §3.
const CONSTRAINT_TRIM_CHARS: &[char] = &['/', '~', '@', ';', '%', '`', '#'];

/// A per-segment constraint: a character-class pattern and an optional required/optional
/// override.
///
/// Trimmed of [`CONSTRAINT_TRIM_CHARS`] before being embedded into the compiled matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pattern: String,
    required: Option<bool>,
}

impl Constraint {
    /// Build a constraint from a raw pattern and an optional required-flag override.
    ///
    /// `required` follows spec.md's resolved Open Question: when `Some`, it wins over
    /// the template's own `{name}`/`{?name}` marker; when `None`, the marker decides.
    #[must_use]
    pub fn new(pattern: impl Into<String>, required: Option<bool>) -> Self {
        let pattern = pattern
            .into()
            .trim_matches(CONSTRAINT_TRIM_CHARS)
            .to_string();
        Self { pattern, required }
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Ordered map of segment name to [`Constraint`], as attached to a route via
/// `Route::where_`.
pub type ConstraintMap = HashMap<String, Constraint>;

/// The default character class used for a segment with no declared constraint.
const DEFAULT_SEGMENT_PATTERN: &str = r"\w+";

/// A compiled matcher derived from a [`crate::route::Route`]'s URI template and
/// constraint map.
///
/// Holds the anchored, Unicode-aware regex (each placeholder replaced by a named capture
/// group) and the ordered list of segment names as they appear in the template, per
/// spec.md §3's `CompiledMatcher`.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
    segment_names: Vec<String>,
}

impl CompiledMatcher {
    /// Compile a URI template against a constraint map.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidTemplate`] if a segment name is declared more than
    /// once in the template (spec.md §4.1 tie-break), or if the resulting pattern fails
    /// to compile as a regex (which would indicate a constraint pattern containing
    /// anchoring or grouping constructs the compiler did not intend to expose).
    pub fn compile(template: &str, constraints: &ConstraintMap) -> Result<Self> {
        Self::compile_with_case(template, constraints, true)
    }

    /// As [`Self::compile`], but controls whether literal segments compare
    /// case-sensitively. Used by [`crate::router::RouterConfig::case_sensitive`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::compile`].
    pub fn compile_with_case(
        template: &str,
        constraints: &ConstraintMap,
        case_sensitive: bool,
    ) -> Result<Self> {
        let mut rewritten = String::with_capacity(template.len() + 16);
        let mut segment_names = Vec::new();
        let mut seen = std::collections::HashSet::new();

        let bytes = template.as_bytes();
        let mut cursor = 0usize;

        while cursor < template.len() {
            if bytes[cursor] == b'{' {
                if let Some(close) = template[cursor..].find('}') {
                    let close = cursor + close;
                    let body = &template[cursor + 1..close];
                    let (optional_marker, name) = if let Some(stripped) = body.strip_prefix('?') {
                        (true, stripped)
                    } else {
                        (false, body)
                    };

                    if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                        if !seen.insert(name.to_string()) {
                            return Err(RouterError::InvalidTemplate {
                                template: template.to_string(),
                                reason: format!("duplicate segment name {name:?}"),
                            });
                        }

                        let constraint = constraints.get(name);
                        let (pattern, required) = match constraint {
                            Some(c) => (
                                c.pattern().to_string(),
                                c.required.unwrap_or(!optional_marker),
                            ),
                            None => (DEFAULT_SEGMENT_PATTERN.to_string(), !optional_marker),
                        };
                        let pattern = if pattern.is_empty() {
                            DEFAULT_SEGMENT_PATTERN.to_string()
                        } else {
                            pattern
                        };

                        if required {
                            rewritten.push_str(&format!("(?P<{name}>{pattern})"));
                        } else if rewritten.ends_with('/') {
                            // Swallow the adjacent separator into the optional group so
                            // `/a/{?x}` matches bare `/a` as well as `/a/foo` — spec.md
                            // §8 property 2, see DESIGN.md for the §4.1 tension this
                            // resolves.
                            rewritten.pop();
                            rewritten.push_str(&format!("(?:/(?P<{name}>{pattern}))?"));
                        } else {
                            rewritten.push_str(&format!("(?P<{name}>{pattern})?"));
                        }
                        segment_names.push(name.to_string());
                        cursor = close + 1;
                        continue;
                    }
                }
            }

            // Literal character: quote it so it is inert as a regex metacharacter.
            let ch = template[cursor..].chars().next().unwrap_or('\0');
            rewritten.push_str(&regex::escape(&ch.to_string()));
            cursor += ch.len_utf8();
        }

        let flags = if case_sensitive { "(?u)" } else { "(?iu)" };
        let anchored = format!("{flags}^{rewritten}$");
        let regex = Regex::new(&anchored).map_err(|e| RouterError::InvalidTemplate {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            regex,
            segment_names,
        })
    }

    /// The ordered list of segment names as they appear in the template.
    #[must_use]
    pub fn segment_names(&self) -> &[String] {
        &self.segment_names
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}
