//! Built-in completion ratio rules, one block per vendor family.
//!
//! Completion ratios follow the vendors' published output/input price ratios.
//! Dated snapshots with their own pricing sit in per-family exception rules
//! ahead of the family's prefix rules.

use super::{Matcher, Rule, RuleEngine};

pub const COMPLETION_RATIO_DEFAULT: f64 = 1.0;

/// Full completion rule table, evaluated after the override table.
pub fn completion_rules() -> RuleEngine {
    RuleEngine::new(COMPLETION_RATIO_DEFAULT)
        .rule(Rule::family(
            "openai",
            Matcher::any_prefix(["gpt", "chatgpt", "o1"]),
            openai_rules(),
        ))
        .rule(Rule::fixed("anthropic-claude-3", Matcher::contains("claude-3"), 5.0))
        .rule(Rule::fixed(
            "anthropic-legacy",
            Matcher::any_contains(["claude-2", "claude-instant-1"]),
            3.0,
        ))
        .rule(Rule::fixed("mistral", Matcher::prefix("mistral-"), 3.0))
        .rule(Rule::fixed("google-gemini", Matcher::prefix("gemini-"), 4.0))
        .rule(Rule::family("cohere", Matcher::prefix("command"), cohere_rules()))
        .rule(Rule::fixed("deepseek", Matcher::prefix("deepseek"), 2.0))
        .rule(Rule::family("ernie", Matcher::prefix("ERNIE-"), ernie_rules()))
        .rule(Rule::fixed("llama2-70b", Matcher::exact("llama2-70b-4096"), 0.8 / 0.64))
        .rule(Rule::fixed("llama3-8b", Matcher::exact("llama3-8b-8192"), 2.0))
        .rule(Rule::fixed("llama3-70b", Matcher::exact("llama3-70b-8192"), 0.79 / 0.59))
}

fn openai_rules() -> RuleEngine {
    RuleEngine::new(1.0)
        .rule(Rule::fixed("gpt-4o-2024-05-13", Matcher::exact("gpt-4o-2024-05-13"), 3.0))
        .rule(Rule::fixed("gpt-3.5-turbo-1106", Matcher::exact("gpt-3.5-turbo-1106"), 2.0))
        .rule(Rule::fixed("chatgpt-4o-latest", Matcher::exact("chatgpt-4o-latest"), 3.0))
        .rule(Rule::fixed("wildcard", Matcher::any_suffix(["-gizmo-*", "-all"]), 1.0))
        .rule(Rule::fixed("4o-o1", Matcher::Custom(is_4o_or_o1), 4.0))
        .rule(Rule::fixed("gpt-4-turbo", Matcher::Custom(is_gpt4_turbo_or_preview), 3.0))
        .rule(Rule::fixed("gpt-4", Matcher::prefix("gpt-4"), 2.0))
        .rule(Rule::fixed("gpt-3.5", Matcher::prefix("gpt-3.5"), 0.75))
}

fn is_4o_or_o1(name: &str) -> bool {
    let model = name
        .strip_prefix("chatgpt-")
        .or_else(|| name.strip_prefix("gpt-"))
        .unwrap_or(name);
    model.starts_with("4o") || name.starts_with("o1-")
}

fn is_gpt4_turbo_or_preview(name: &str) -> bool {
    name.starts_with("gpt-4")
        && (name.starts_with("gpt-4-turbo")
            || name.ends_with("-turbo")
            || name.ends_with("-preview"))
}

fn cohere_rules() -> RuleEngine {
    RuleEngine::new(4.0)
        .rule(Rule::fixed("command-r", Matcher::exact("command-r"), 3.0))
        .rule(Rule::fixed("command-r-plus", Matcher::exact("command-r-plus"), 5.0))
}

fn ernie_rules() -> RuleEngine {
    RuleEngine::new(COMPLETION_RATIO_DEFAULT)
        .rule(Rule::fixed(
            "ernie-flat",
            Matcher::any_prefix([
                "ERNIE-Speed",
                "ERNIE-Lite",
                "ERNIE-Character",
                "ERNIE-Functions",
            ]),
            2.0,
        ))
        .rule(Rule::computed("ernie-list-price", Matcher::Any, ernie_list_price_ratio))
}

/// ERNIE list prices in RMB per 1K tokens: `(model, input, output)`.
const ERNIE_LIST_PRICES: &[(&str, f64, f64)] = &[
    ("ERNIE-4.0-Turbo-8K", 0.02, 0.06),
    ("ERNIE-4.0-8K", 0.03, 0.09),
    ("ERNIE-3.5-8K", 0.012, 0.012),
    ("ERNIE-Bot-8K", 0.024, 0.048),
    ("ERNIE-Tiny-8K", 0.001, 0.001),
];

/// Output/input list price ratio for an ERNIE model, 1 when the model is unlisted.
pub fn ernie_list_price_ratio(name: &str) -> f64 {
    ERNIE_LIST_PRICES
        .iter()
        .find(|(model, _, _)| name.starts_with(model))
        .map(|(_, input, output)| output / input)
        .unwrap_or(COMPLETION_RATIO_DEFAULT)
}
