use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IvrError, Result};
use crate::flow::TargetRef;

/// 意图模式：关键词集合、权重与路由目标
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentPattern {
    pub name: String,
    pub keywords: Vec<String>,
    pub weight: f64,
    pub target: TargetRef,
}

impl IntentPattern {
    pub fn new(name: &str, keywords: &[&str], weight: f64, target: TargetRef) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            weight,
            target,
        }
    }
}

/// 寒暄应答文本
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreetingResponses {
    pub greeting: String,
    pub how_are_you: String,
    pub thanks: String,
    pub polite: String,
}

/// 分类器配置
///
/// 进程内构造一次后只读，通过引用注入解释器
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub greeting_words: Vec<String>,
    pub how_are_you_phrases: Vec<String>,
    pub thanks_words: Vec<String>,
    pub polite_words: Vec<String>,
    pub responses: GreetingResponses,
    pub intents: Vec<IntentPattern>,
    /// 数字词到按键的映射，按声明顺序匹配
    pub number_words: Vec<(String, String)>,
    /// 短语到标准舱位名
    pub class_mappings: Vec<(String, String)>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            greeting_words: owned(&[
                "hi",
                "hello",
                "hey",
                "good morning",
                "good afternoon",
                "good evening",
                "good night",
            ]),
            how_are_you_phrases: owned(&["how are you", "how do you do"]),
            thanks_words: owned(&["thank", "thanks", "appreciate"]),
            polite_words: owned(&["nice", "good", "great", "wonderful"]),
            responses: GreetingResponses {
                greeting: "Hello! I'm doing great, thank you for asking! How can I help you with your train enquiry today?".into(),
                how_are_you: "I'm doing wonderful, thank you! I'm here and ready to help you with all your train-related needs. What would you like to do today?".into(),
                thanks: "You're very welcome! Is there anything else I can help you with?".into(),
                polite: "That's very kind of you to ask! I'm here to assist you. How can I help with your train enquiry?".into(),
            },
            intents: vec![
                IntentPattern::new(
                    "booking",
                    &["book", "booking", "buy", "purchase", "reserve", "ticket", "tickets"],
                    1.0,
                    TargetRef::flow("booking"),
                ),
                IntentPattern::new(
                    "status",
                    &["status", "check", "running", "running status", "train status", "where is", "location"],
                    1.0,
                    TargetRef::flow("status"),
                ),
                IntentPattern::new(
                    "schedule",
                    &["schedule", "time", "timing", "departure", "arrival", "when", "what time"],
                    1.0,
                    TargetRef::flow("schedule"),
                ),
                IntentPattern::new(
                    "cancellation",
                    &["cancel", "cancellation", "cancel ticket", "refund", "delete booking"],
                    1.0,
                    TargetRef::flow("cancellation"),
                ),
                IntentPattern::new(
                    "pnr",
                    &["pnr", "pnr status", "check pnr", "booking status", "my ticket", "my booking"],
                    1.0,
                    TargetRef::flow("pnr_status"),
                ),
                IntentPattern::new(
                    "seat_availability",
                    &["seat", "seats", "available", "availability", "vacant", "empty seats", "booked"],
                    0.9,
                    TargetRef::flow("seat_availability"),
                ),
                IntentPattern::new(
                    "fare",
                    &["fare", "price", "cost", "how much", "charge", "fee", "ticket price"],
                    1.0,
                    TargetRef::flow("fare_enquiry"),
                ),
                IntentPattern::new(
                    "trains_between",
                    &["between", "from to", "trains between", "stations", "route", "find train"],
                    0.9,
                    TargetRef::flow("train_between_stations"),
                ),
                IntentPattern::new(
                    "agent",
                    &["agent", "support", "help", "representative", "human", "person", "talk to"],
                    1.0,
                    TargetRef::flow("agent"),
                ),
                IntentPattern::new(
                    "repeat",
                    &["repeat", "again", "say again", "repeat menu", "what are options"],
                    0.8,
                    TargetRef::state("repeat_menu"),
                ),
                IntentPattern::new(
                    "menu",
                    &["menu", "main menu", "options", "back", "go back", "home"],
                    0.8,
                    TargetRef::state("main_menu"),
                ),
            ],
            number_words: pairs(&[
                ("one", "1"),
                ("two", "2"),
                ("three", "3"),
                ("four", "4"),
                ("five", "5"),
                ("six", "6"),
                ("seven", "7"),
                ("eight", "8"),
                ("nine", "9"),
                ("zero", "0"),
                ("first", "1"),
                ("second", "2"),
                ("third", "3"),
            ]),
            class_mappings: pairs(&[
                ("sleeper", "Sleeper"),
                ("ac", "AC"),
                ("ac 3", "AC 3 Tier"),
                ("ac tier", "AC 3 Tier"),
                ("ac 2", "AC 2 Tier"),
                ("ac second", "AC 2 Tier"),
                ("first ac", "First AC"),
                ("first class", "First AC"),
                ("tatkal", "Tatkal"),
            ]),
        }
    }
}

impl ClassifierConfig {
    /// 从 JSON 文件加载替代配置
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            IvrError::Config(format!(
                "invalid classifier config `{}`: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn intent(&self, name: &str) -> Option<&IntentPattern> {
        self.intents.iter().find(|p| p.name == name)
    }
}
