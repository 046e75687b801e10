use std::sync::Arc;

use serde::Serialize;

use crate::config::IvrSettings;
use crate::error::Result;
use crate::flow::{DirectorySource, FlowInterpreter, FlowStore};
use crate::nlp::{ClassifierConfig, IntentClassifier};
use crate::response::{ResponseGenerator, SimulatedBackend};
use crate::runtime::IvrRuntime;
use crate::utils::FlowValidator;

#[derive(Clone, Debug, Serialize)]
pub struct FlowSummaryEntry {
    pub name: String,
    pub entry_state: String,
    pub states: usize,
    pub issues: Vec<String>,
}

/// 已加载流程的概要，含静态检查结果
pub fn flow_summaries(store: &FlowStore) -> Vec<FlowSummaryEntry> {
    let snapshot = store.snapshot();
    let known: Vec<&str> = snapshot.keys().map(String::as_str).collect();
    let mut entries: Vec<FlowSummaryEntry> = snapshot
        .values()
        .map(|flow| FlowSummaryEntry {
            name: flow.name.clone(),
            entry_state: flow.entry_state().to_string(),
            states: flow.states.len(),
            issues: FlowValidator::validate(flow, &known)
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// 按设置构造分类器
pub fn build_classifier(settings: &IvrSettings) -> Result<IntentClassifier> {
    let config = match &settings.classifier_config {
        Some(path) => ClassifierConfig::from_path(path)?,
        None => ClassifierConfig::default(),
    };
    Ok(IntentClassifier::new(Arc::new(config)))
}

/// 按设置加载流程并组装运行时
pub async fn build_runtime(settings: &IvrSettings) -> Result<IvrRuntime> {
    let classifier = build_classifier(settings)?;
    let backend = match settings.seed {
        Some(seed) => SimulatedBackend::seeded(seed),
        None => SimulatedBackend::from_entropy(),
    };
    let interpreter = FlowInterpreter::new(classifier, ResponseGenerator::new(Arc::new(backend)))
        .with_root_flow(settings.root_flow.clone());

    let source = Arc::new(DirectorySource::new(settings.flows_dir.clone()));
    let store = Arc::new(FlowStore::load(source).await);
    Ok(IvrRuntime::new(store, interpreter))
}
