//! Audio token ratios for realtime and audio-preview models.

use super::{Matcher, Rule, RuleEngine};

pub const AUDIO_RATIO_DEFAULT: f64 = 20.0;
pub const AUDIO_COMPLETION_RATIO_DEFAULT: f64 = 2.0;

/// Input audio ratio, relative to the model's text input ratio.
pub fn audio_rules() -> RuleEngine {
    RuleEngine::new(AUDIO_RATIO_DEFAULT)
        .rule(Rule::fixed("realtime", Matcher::prefix("gpt-4o-realtime"), 20.0))
        .rule(Rule::fixed("audio-preview", Matcher::prefix("gpt-4o-audio"), 40.0))
}

/// Output audio ratio, relative to the input audio ratio.
pub fn audio_completion_rules() -> RuleEngine {
    RuleEngine::new(AUDIO_COMPLETION_RATIO_DEFAULT).rule(Rule::fixed(
        "realtime",
        Matcher::prefix("gpt-4o-realtime"),
        2.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_input() {
        let rules = audio_rules();
        assert_eq!(rules.evaluate("gpt-4o-realtime-preview"), 20.0);
        assert_eq!(rules.evaluate("gpt-4o-audio-preview"), 40.0);
        assert_eq!(rules.evaluate("whisper-1"), AUDIO_RATIO_DEFAULT);
    }

    #[test]
    fn test_audio_output() {
        let rules = audio_completion_rules();
        assert_eq!(rules.evaluate("gpt-4o-realtime-preview-2024-10-01"), 2.0);
        assert_eq!(rules.evaluate("gpt-4o-audio-preview"), AUDIO_COMPLETION_RATIO_DEFAULT);
    }
}
