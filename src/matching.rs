//! The outcome of applying a [`crate::pattern::CompiledMatcher`] to a request path.

use crate::pattern::CompiledMatcher;
use std::collections::HashMap;

/// Result of matching a path against a [`CompiledMatcher`].
///
/// `named` and `values` are two views onto the same captures: `named` for lookup by
/// segment name, `values` for positional access in declaration order (spec.md §3 —
/// "`values` preserves the segment declaration order from the `CompiledMatcher`, not
/// any sort order").
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    matched: bool,
    named: HashMap<String, String>,
    values: Vec<Option<String>>,
}

impl MatchResult {
    /// A result representing "no match" — every accessor reports absence.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Match `path` against `matcher`, capturing every declared segment.
    #[must_use]
    pub fn apply(matcher: &CompiledMatcher, path: &str) -> Self {
        let Some(caps) = matcher.regex().captures(path) else {
            return Self::none();
        };

        let mut named = HashMap::new();
        let mut values = Vec::with_capacity(matcher.segment_names().len());
        for name in matcher.segment_names() {
            let captured = caps.name(name).map(|m| m.as_str().to_string());
            if let Some(v) = &captured {
                named.insert(name.clone(), v.clone());
            }
            values.push(captured);
        }

        Self {
            matched: true,
            named,
            values,
        }
    }

    /// Whether the path matched the compiled pattern at all.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// Look up a captured segment by name.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// The full name → value map of captured segments (absent segments are omitted).
    #[must_use]
    pub fn named_map(&self) -> &HashMap<String, String> {
        &self.named
    }

    /// Captured values in the matcher's declaration order; `None` for an absent optional
    /// segment.
    #[must_use]
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}
