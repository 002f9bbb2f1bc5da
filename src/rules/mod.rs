//! Ordered rule tables mapping model names to ratios.
//!
//! A [`RuleEngine`] is a list of `(matcher, source)` pairs evaluated top-down;
//! the first matching rule produces the ratio and the engine's default is the
//! terminal fallback. Vendor families with their own exceptions nest a child
//! engine as the rule's source, so family sub-rules stay local to the family.

mod audio;
mod completion;

pub use audio::{
    AUDIO_COMPLETION_RATIO_DEFAULT, AUDIO_RATIO_DEFAULT, audio_completion_rules, audio_rules,
};
pub use completion::{COMPLETION_RATIO_DEFAULT, completion_rules, ernie_list_price_ratio};

use std::sync::Arc;

/// Predicate over a model name.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    AnyExact(Vec<String>),
    AnyPrefix(Vec<String>),
    AnySuffix(Vec<String>),
    AnyContains(Vec<String>),
    Custom(fn(&str) -> bool),
    Any,
}

impl Matcher {
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn any_exact<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyExact(names.into_iter().map(Into::into).collect())
    }

    pub fn any_prefix<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyPrefix(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn any_suffix<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnySuffix(suffixes.into_iter().map(Into::into).collect())
    }

    pub fn any_contains<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyContains(needles.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(s) => name == s.as_str(),
            Self::Prefix(s) => name.starts_with(s.as_str()),
            Self::Suffix(s) => name.ends_with(s.as_str()),
            Self::Contains(s) => name.contains(s.as_str()),
            Self::AnyExact(list) => list.iter().any(|s| name == s.as_str()),
            Self::AnyPrefix(list) => list.iter().any(|s| name.starts_with(s.as_str())),
            Self::AnySuffix(list) => list.iter().any(|s| name.ends_with(s.as_str())),
            Self::AnyContains(list) => list.iter().any(|s| name.contains(s.as_str())),
            Self::Custom(f) => f(name),
            Self::Any => true,
        }
    }
}

/// Where a matching rule gets its ratio from.
#[derive(Debug, Clone)]
pub enum RatioSource {
    Fixed(f64),
    Computed(fn(&str) -> f64),
    /// Delegate to a family's own rule table.
    Engine(Arc<RuleEngine>),
}

impl RatioSource {
    pub fn resolve(&self, name: &str) -> f64 {
        match self {
            Self::Fixed(ratio) => *ratio,
            Self::Computed(f) => f(name),
            Self::Engine(engine) => engine.evaluate(name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub matcher: Matcher,
    pub source: RatioSource,
}

impl Rule {
    pub fn new(name: impl Into<String>, matcher: Matcher, source: RatioSource) -> Self {
        Self {
            name: name.into(),
            matcher,
            source,
        }
    }

    pub fn fixed(name: impl Into<String>, matcher: Matcher, ratio: f64) -> Self {
        Self::new(name, matcher, RatioSource::Fixed(ratio))
    }

    pub fn computed(name: impl Into<String>, matcher: Matcher, f: fn(&str) -> f64) -> Self {
        Self::new(name, matcher, RatioSource::Computed(f))
    }

    pub fn family(name: impl Into<String>, matcher: Matcher, engine: RuleEngine) -> Self {
        Self::new(name, matcher, RatioSource::Engine(Arc::new(engine)))
    }
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    default: f64,
}

impl RuleEngine {
    pub fn new(default: f64) -> Self {
        Self {
            rules: Vec::new(),
            default,
        }
    }

    /// Append a rule after all existing ones.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_ratio(&self) -> f64 {
        self.default
    }

    /// First rule whose matcher accepts `name`.
    pub fn matching_rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matcher.matches(name))
    }

    /// Names of the rules that fire for `name`, outermost first.
    pub fn trace(&self, name: &str) -> Vec<String> {
        let mut path = Vec::new();
        let mut engine = self;
        while let Some(rule) = engine.matching_rule(name) {
            path.push(rule.name.clone());
            match &rule.source {
                RatioSource::Engine(child) => engine = child.as_ref(),
                _ => break,
            }
        }
        path
    }

    pub fn evaluate(&self, name: &str) -> f64 {
        match self.matching_rule(name) {
            Some(rule) => {
                let ratio = rule.source.resolve(name);
                tracing::trace!(model = name, rule = %rule.name, ratio, "ratio rule matched");
                ratio
            }
            None => self.default,
        }
    }
}
