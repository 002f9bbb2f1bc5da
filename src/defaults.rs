//! Compiled-in baseline tables.
//!
//! Ratios use the unit `1 == $0.002 / 1K tokens` (`$2 / 1M tokens`). Prices are
//! flat USD per call.

use std::collections::HashMap;

use crate::threshold::ThresholdConfig;

/// RMB per USD used for RMB-priced models.
pub const USD2RMB: f64 = 7.3;
/// Ratio for $1 / 1K tokens.
pub const USD: f64 = 500.0;
/// Ratio for ¥1 / 1K tokens.
pub const RMB: f64 = USD / USD2RMB;

/// Context tokens above which `claude-sonnet-4` bills at the long-context tier.
const SONNET_4_LONG_CONTEXT_TOKENS: u64 = 200_000;

const MODEL_RATIOS: &[(&str, f64)] = &[
    // OpenAI
    ("gpt-4", 15.0),
    ("gpt-4-0613", 15.0),
    ("gpt-4-32k", 30.0),
    ("gpt-4-turbo", 5.0),
    ("gpt-4-turbo-2024-04-09", 5.0),
    ("gpt-4-1106-preview", 5.0),
    ("gpt-4o", 1.25),
    ("gpt-4o-2024-05-13", 2.5),
    ("gpt-4o-2024-08-06", 1.25),
    ("chatgpt-4o-latest", 2.5),
    ("gpt-4o-mini", 0.075),
    ("gpt-4o-realtime-preview", 2.5),
    ("gpt-4o-audio-preview", 1.25),
    ("gpt-3.5-turbo", 0.25),
    ("gpt-3.5-turbo-0125", 0.25),
    ("gpt-3.5-turbo-1106", 0.5),
    ("o1-preview", 7.5),
    ("o1-mini", 1.5),
    ("gpt-4-gizmo-*", 15.0),
    ("gpt-4o-gizmo-*", 2.5),
    ("gpt-4-all", 15.0),
    ("text-embedding-3-small", 0.01),
    ("text-embedding-3-large", 0.065),
    ("text-embedding-ada-002", 0.05),
    ("whisper-1", 15.0),
    ("tts-1", 7.5),
    ("tts-1-hd", 15.0),
    // Anthropic
    ("claude-instant-1.2", 0.4),
    ("claude-2.0", 4.0),
    ("claude-2.1", 4.0),
    ("claude-3-haiku-20240307", 0.125),
    ("claude-3-5-haiku-20241022", 0.5),
    ("claude-3-sonnet-20240229", 1.5),
    ("claude-3-5-sonnet-20240620", 1.5),
    ("claude-3-5-sonnet-20241022", 1.5),
    ("claude-3-opus-20240229", 7.5),
    ("claude-sonnet-4", 1.5),
    ("claude-sonnet-4-20250514", 1.5),
    ("claude-opus-4-20250514", 7.5),
    // Google
    ("gemini-1.5-pro", 0.625),
    ("gemini-1.5-flash", 0.0375),
    ("gemini-2.0-flash", 0.05),
    // Mistral
    ("mistral-large-latest", 1.0),
    ("mistral-small-latest", 0.1),
    // Cohere
    ("command-r", 0.25),
    ("command-r-plus", 1.5),
    // Deepseek
    ("deepseek-chat", 0.07),
    ("deepseek-reasoner", 0.275),
    // Groq-hosted Llama
    ("llama2-70b-4096", 0.32),
    ("llama3-8b-8192", 0.025),
    ("llama3-70b-8192", 0.295),
];

/// ERNIE models, priced in RMB per 1K input tokens.
const ERNIE_RMB_PRICES: &[(&str, f64)] = &[
    ("ERNIE-4.0-8K", 0.03),
    ("ERNIE-4.0-Turbo-8K", 0.02),
    ("ERNIE-3.5-8K", 0.012),
    ("ERNIE-Bot-8K", 0.024),
    ("ERNIE-Speed-8K", 0.004),
    ("ERNIE-Lite-8K", 0.003),
];

const MODEL_PRICES: &[(&str, f64)] = &[
    ("suno_music", 0.1),
    ("suno_lyrics", 0.01),
    ("dall-e-3", 0.04),
    ("gpt-4-gizmo-*", 0.1),
    ("mj_imagine", 0.1),
    ("mj_variation", 0.1),
    ("mj_reroll", 0.1),
    ("mj_blend", 0.1),
    ("mj_modal", 0.1),
    ("mj_zoom", 0.1),
    ("mj_shorten", 0.1),
    ("mj_high_variation", 0.1),
    ("mj_low_variation", 0.1),
    ("mj_pan", 0.1),
    ("mj_inpaint", 0.0),
    ("mj_custom_zoom", 0.0),
    ("mj_describe", 0.05),
    ("mj_upscale", 0.05),
    ("swap_face", 0.05),
    ("mj_upload", 0.05),
];

const COMPLETION_RATIOS: &[(&str, f64)] = &[
    ("gpt-4-gizmo-*", 2.0),
    ("gpt-4o-gizmo-*", 3.0),
    ("gpt-4-all", 2.0),
];

fn to_map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(name, ratio)| (name.to_string(), *ratio))
        .collect()
}

pub fn model_ratios() -> HashMap<String, f64> {
    let mut ratios = to_map(MODEL_RATIOS);
    ratios.extend(
        ERNIE_RMB_PRICES
            .iter()
            .map(|(name, rmb)| (name.to_string(), rmb * RMB)),
    );
    ratios
}

pub fn model_prices() -> HashMap<String, f64> {
    to_map(MODEL_PRICES)
}

pub fn completion_ratios() -> HashMap<String, f64> {
    to_map(COMPLETION_RATIOS)
}

pub fn thresholds() -> HashMap<String, ThresholdConfig> {
    let sonnet_4 = ThresholdConfig::new(
        "claude-sonnet-4",
        SONNET_4_LONG_CONTEXT_TOKENS,
        10.0,
        30.0,
    );
    HashMap::from([(sonnet_4.model_name.clone(), sonnet_4)])
}
