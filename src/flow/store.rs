use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;

use crate::error::{IvrError, Result};
use crate::flow::types::FlowDefinition;
use crate::utils::validation::FlowValidator;

/// 原服务自带的流程文件
pub const DEFAULT_FLOW_NAMES: [&str; 10] = [
    "train_main",
    "booking",
    "status",
    "schedule",
    "cancellation",
    "agent",
    "pnr_status",
    "seat_availability",
    "fare_enquiry",
    "train_between_stations",
];

/// 流程定义来源 trait
#[async_trait]
pub trait FlowSource: Send + Sync {
    /// 列出可加载的流程名
    async fn list(&self) -> Result<Vec<String>>;
    /// 读取并解析单个流程
    async fn fetch(&self, name: &str) -> Result<FlowDefinition>;
}

/// 目录来源：`<dir>/<name>.json`
pub struct DirectorySource {
    dir: PathBuf,
    names: Option<Vec<String>>,
}

impl DirectorySource {
    /// 扫描目录下所有 `.json` 文件
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: None,
        }
    }

    /// 只加载给定的流程名；缺失的文件在加载时记录警告
    pub fn with_flows<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FlowSource for DirectorySource {
    async fn list(&self) -> Result<Vec<String>> {
        if let Some(names) = &self.names {
            return Ok(names.clone());
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn fetch(&self, name: &str) -> Result<FlowDefinition> {
        let path = self.dir.join(format!("{name}.json"));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(IvrError::FlowNotFound(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        FlowDefinition::from_json_str(name, &content)
    }
}

/// 内存来源，内容可在两次重载之间替换
#[derive(Default)]
pub struct MemorySource {
    flows: RwLock<HashMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, json: impl Into<String>) {
        self.flows.write().insert(name.into(), json.into());
    }

    pub fn remove(&self, name: &str) {
        self.flows.write().remove(name);
    }
}

#[async_trait]
impl FlowSource for MemorySource {
    async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.flows.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn fetch(&self, name: &str) -> Result<FlowDefinition> {
        let content = self
            .flows
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| IvrError::FlowNotFound(name.to_string()))?;
        FlowDefinition::from_json_str(name, &content)
    }
}

/// 一次加载得到的完整流程集合
pub type FlowSet = HashMap<String, Arc<FlowDefinition>>;

/// 流程缓存
///
/// 读取只克隆当前快照的 `Arc`；重载在锁外构建完整的新集合后一次性替换，
/// 进行中的解释不会看到半更新的流程集。
pub struct FlowStore {
    source: Arc<dyn FlowSource>,
    snapshot: RwLock<Arc<FlowSet>>,
}

impl FlowStore {
    /// 创建并立即加载；单个流程失败不影响启动
    pub async fn load(source: Arc<dyn FlowSource>) -> Self {
        let store = Self {
            source,
            snapshot: RwLock::new(Arc::new(FlowSet::new())),
        };
        store.reload().await;
        store
    }

    pub fn get(&self, name: &str) -> Option<Arc<FlowDefinition>> {
        self.snapshot.read().get(name).cloned()
    }

    /// 缺失的流程返回空定义
    pub fn get_or_empty(&self, name: &str) -> Arc<FlowDefinition> {
        self.get(name)
            .unwrap_or_else(|| Arc::new(FlowDefinition::empty(name)))
    }

    pub fn snapshot(&self) -> Arc<FlowSet> {
        self.snapshot.read().clone()
    }

    pub fn flow_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }

    /// 重新加载全部流程，返回成功加载的数量
    pub async fn reload(&self) -> usize {
        let names = match self.source.list().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list flows, keeping current set");
                return self.len();
            }
        };

        let fetched = join_all(names.iter().map(|name| self.source.fetch(name))).await;

        let mut flows = FlowSet::new();
        for (name, result) in names.iter().zip(fetched) {
            match result {
                Ok(mut flow) => {
                    // 以来源键为准，导航与根流程判断都按键查找
                    if flow.name != *name {
                        tracing::debug!(flow = %name, declared = %flow.name, "flow name differs from its key");
                        flow.name = name.clone();
                    }
                    flows.insert(name.clone(), Arc::new(flow));
                }
                Err(err) => tracing::warn!(flow = %name, error = %err, "skipping flow"),
            }
        }

        let known: Vec<&str> = flows.keys().map(String::as_str).collect();
        for flow in flows.values() {
            for issue in FlowValidator::validate(flow, &known) {
                tracing::warn!(flow = %flow.name, issue = %issue, "flow validation");
            }
        }

        let count = flows.len();
        *self.snapshot.write() = Arc::new(flows);
        tracing::info!(count, "flows loaded");
        count
    }
}
