// 意图与实体识别模块

mod classifier;
mod config;
mod context;
pub mod entities;
mod similarity;

pub use classifier::{
    is_keypad_symbol, GreetingKind, GreetingReply, IntentClassifier, IntentMatch, Recognition,
};
pub use config::{ClassifierConfig, GreetingResponses, IntentPattern};
pub use context::ContextAnalysis;
pub use similarity::{ratio, similarity};
