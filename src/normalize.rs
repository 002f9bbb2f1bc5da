//! Model name canonicalization.
//!
//! Some vendor families expose many concrete model names that share one billing
//! rule. Before any table lookup those names are rewritten to a wildcard family
//! key so a single override entry covers the whole family.

use std::borrow::Cow;

/// A `prefix -> family key` rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRule {
    pub prefix: String,
    pub family_key: String,
}

impl FamilyRule {
    pub fn new(prefix: impl Into<String>, family_key: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            family_key: family_key.into(),
        }
    }
}

/// Ordered list of family rules; the first matching prefix wins.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    rules: Vec<FamilyRule>,
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The gizmo families used by OpenAI-compatible upstreams.
    pub fn builtin() -> Self {
        Self::new()
            .rule("gpt-4-gizmo", "gpt-4-gizmo-*")
            .rule("gpt-4o-gizmo", "gpt-4o-gizmo-*")
    }

    pub fn rule(mut self, prefix: impl Into<String>, family_key: impl Into<String>) -> Self {
        self.rules.push(FamilyRule::new(prefix, family_key));
        self
    }

    pub fn rules(&self) -> &[FamilyRule] {
        &self.rules
    }

    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self.rules.iter().find(|r| name.starts_with(&r.prefix)) {
            Some(rule) => {
                tracing::debug!(model = name, family = %rule.family_key, "normalized model name");
                Cow::Owned(rule.family_key.clone())
            }
            None => Cow::Borrowed(name),
        }
    }

    /// Whether `name` is itself one of the family keys.
    pub fn is_family_key(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.family_key == name)
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::builtin()
    }
}
