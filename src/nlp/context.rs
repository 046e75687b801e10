use std::collections::BTreeMap;

use serde::Serialize;

use super::classifier::{IntentClassifier, Recognition};
use crate::flow::constants::fields;
use crate::flow::TargetRef;

/// 综合上下文分析结果：意图与所有可提取实体
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContextAnalysis {
    pub intent: Option<String>,
    pub suggested_action: Option<TargetRef>,
    pub confidence: f64,
    pub extracted_data: BTreeMap<String, String>,
}

impl IntentClassifier {
    pub fn understand_context(&self, text: &str) -> ContextAnalysis {
        let mut analysis = ContextAnalysis::default();

        if let Some(Recognition::Intent(m)) = self.extract_intent(text) {
            analysis.intent = Some(m.intent);
            analysis.suggested_action = Some(m.target);
            analysis.confidence = m.confidence;
        }

        let entities = [
            (fields::TRAIN_NUMBER, self.extract_train_number(text)),
            (fields::PNR, self.extract_pnr(text)),
            (fields::TRAIN_CLASS, self.extract_class_from_speech(text)),
        ];
        for (field, value) in entities {
            if let Some(value) = value {
                analysis.extracted_data.insert(field.to_string(), value);
            }
        }

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_intent_and_entities() {
        let analysis = IntentClassifier::default().understand_context("cancel pnr 4521987730");
        assert_eq!(analysis.intent.as_deref(), Some("cancellation"));
        assert_eq!(
            analysis.extracted_data.get("pnr").map(String::as_str),
            Some("4521987730")
        );
        assert!(!analysis.extracted_data.contains_key("train_number"));
    }
}
