use std::sync::Arc;

use serde::Serialize;

use super::config::{ClassifierConfig, IntentPattern};
use super::entities;
use super::similarity::similarity;
use crate::flow::constants::thresholds;
use crate::flow::TargetRef;

/// 寒暄类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingKind {
    Greeting,
    HowAreYou,
    Thanks,
    Polite,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GreetingReply {
    pub kind: GreetingKind,
    pub response: String,
}

/// 意图匹配结果，仅在单次调用内存在
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntentMatch {
    pub intent: String,
    pub target: TargetRef,
    pub confidence: f64,
}

/// 意图识别结果
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recognition {
    Greeting(GreetingReply),
    /// 数字词（“one”、“first” 等）对应的按键
    KeypadEquivalent { digit: String },
    Intent(IntentMatch),
}

impl Recognition {
    pub fn as_intent(&self) -> Option<&IntentMatch> {
        match self {
            Recognition::Intent(m) => Some(m),
            _ => None,
        }
    }
}

/// 意图分类器
///
/// 无状态：所有方法都是基于配置表和输入文本的纯函数
#[derive(Clone, Debug)]
pub struct IntentClassifier {
    config: Arc<ClassifierConfig>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(Arc::new(ClassifierConfig::default()))
    }
}

struct Candidate<'a> {
    pattern: &'a IntentPattern,
    score: f64,
}

impl IntentClassifier {
    pub fn new(config: Arc<ClassifierConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// 寒暄检测，优先于意图打分
    pub fn is_greeting(&self, text: &str) -> Option<GreetingReply> {
        let lower = text.to_lowercase();
        let lower = lower.trim();
        let cfg = &self.config;
        let reply = |kind: GreetingKind, response: &str| GreetingReply {
            kind,
            response: response.to_string(),
        };

        if contains_any(lower, &cfg.greeting_words) {
            if contains_any(lower, &cfg.how_are_you_phrases) {
                return Some(reply(GreetingKind::HowAreYou, &cfg.responses.how_are_you));
            }
            return Some(reply(GreetingKind::Greeting, &cfg.responses.greeting));
        }
        if contains_any(lower, &cfg.thanks_words) {
            return Some(reply(GreetingKind::Thanks, &cfg.responses.thanks));
        }
        if contains_any(lower, &cfg.polite_words) {
            return Some(reply(GreetingKind::Polite, &cfg.responses.polite));
        }
        None
    }

    /// 识别意图
    pub fn extract_intent(&self, text: &str) -> Option<Recognition> {
        let lower = text.to_lowercase();
        let input = lower.trim();

        if let Some(greeting) = self.is_greeting(input) {
            return Some(Recognition::Greeting(greeting));
        }

        if is_keypad_symbol(input) {
            return None;
        }

        if let Some((_, digit)) = self
            .config
            .number_words
            .iter()
            .find(|(word, _)| input.contains(word.as_str()))
        {
            return Some(Recognition::KeypadEquivalent {
                digit: digit.clone(),
            });
        }

        let mut best: Option<Candidate<'_>> = None;
        let mut propose = |pattern, score: f64| {
            if score > best.as_ref().map_or(0.0, |c| c.score) {
                best = Some(Candidate { pattern, score });
            }
        };

        for pattern in &self.config.intents {
            for keyword in &pattern.keywords {
                if input.contains(keyword.as_str()) {
                    propose(pattern, pattern.weight);
                }
                if keyword.chars().count() > thresholds::FUZZY_MIN_KEYWORD_LEN {
                    let ratio = similarity(input, keyword);
                    if ratio > thresholds::FUZZY_KEYWORD {
                        propose(pattern, pattern.weight * ratio);
                    }
                }
            }
        }

        // 字面命中且为独立词时给予上下文加权，可覆盖模糊匹配结果
        let tokens: Vec<&str> = input.split_whitespace().collect();
        for pattern in &self.config.intents {
            for keyword in &pattern.keywords {
                if input.contains(keyword.as_str()) && tokens.contains(&keyword.as_str()) {
                    propose(pattern, pattern.weight * thresholds::CONTEXT_BOOST);
                }
            }
        }

        let best = best.filter(|c| c.score > thresholds::INTENT_ACCEPT)?;
        tracing::debug!(
            intent = %best.pattern.name,
            score = best.score,
            "intent recognised"
        );
        Some(Recognition::Intent(IntentMatch {
            intent: best.pattern.name.clone(),
            target: best.pattern.target.clone(),
            confidence: best.score.min(1.0),
        }))
    }

    pub fn extract_class_from_speech(&self, text: &str) -> Option<String> {
        entities::extract_class(text, &self.config.class_mappings)
    }

    pub fn extract_train_number(&self, text: &str) -> Option<String> {
        entities::extract_train_number(text)
    }

    pub fn extract_pnr(&self, text: &str) -> Option<String> {
        entities::extract_pnr(text)
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity(a, b)
    }
}

fn contains_any(input: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| input.contains(needle.as_str()))
}

/// 单个按键字符（数字、`*`、`#`）
pub fn is_keypad_symbol(input: &str) -> bool {
    let mut chars = input.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_ascii_digit() || c == '*' || c == '#'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    fn intent_of(text: &str) -> Option<IntentMatch> {
        classifier()
            .extract_intent(text)
            .and_then(|r| r.as_intent().cloned())
    }

    #[test]
    fn greeting_variants() {
        let c = classifier();
        assert_eq!(c.is_greeting("Hello there").unwrap().kind, GreetingKind::Greeting);
        assert_eq!(
            c.is_greeting("hey, how are you?").unwrap().kind,
            GreetingKind::HowAreYou
        );
        assert_eq!(c.is_greeting("thank you").unwrap().kind, GreetingKind::Thanks);
        assert_eq!(c.is_greeting("that was great").unwrap().kind, GreetingKind::Polite);
        assert!(c.is_greeting("cancel").is_none());
    }

    #[test]
    fn keypad_symbols_are_deferred() {
        let c = classifier();
        for key in ["0", "1", "5", "9", "*", "#", " 7 "] {
            assert!(c.extract_intent(key).is_none(), "{key:?} should defer");
        }
    }

    #[test]
    fn number_words_win_over_intents() {
        let result = classifier().extract_intent("option one for booking");
        assert_eq!(
            result,
            Some(Recognition::KeypadEquivalent { digit: "1".into() })
        );
    }

    #[test]
    fn literal_token_gets_context_boost() {
        let m = intent_of("cancel").unwrap();
        assert_eq!(m.intent, "cancellation");
        assert_eq!(m.target, TargetRef::flow("cancellation"));
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn fuzzy_match_recovers_misspelling() {
        let m = intent_of("shedule").unwrap();
        assert_eq!(m.intent, "schedule");
        assert!(m.confidence > 0.9 && m.confidence < 1.0);
    }

    #[test]
    fn low_weight_intents_still_pass_acceptance() {
        let m = intent_of("repeat").unwrap();
        assert_eq!(m.intent, "repeat");
        assert_eq!(m.target, TargetRef::state("repeat_menu"));
    }

    #[test]
    fn unrelated_text_yields_nothing() {
        assert!(classifier().extract_intent("invalid utterance").is_none());
    }
}
