use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{IvrError, Result};
use crate::flow::constants::{fields, names};

// Flow 核心类型定义

/// 跳转目标：当前流程内的状态，或另一个流程
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetRef {
    State(String),
    Flow(String),
}

impl TargetRef {
    pub fn state(id: impl Into<String>) -> Self {
        TargetRef::State(id.into())
    }

    pub fn flow(name: impl Into<String>) -> Self {
        TargetRef::Flow(name.into())
    }

    /// 解析 `flow:<name>` 或状态 ID
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(names::FLOW_PREFIX) {
            Some(name) => TargetRef::Flow(name.to_string()),
            None => TargetRef::State(raw.to_string()),
        }
    }

    pub fn is_flow(&self) -> bool {
        matches!(self, TargetRef::Flow(_))
    }

    pub fn as_state(&self) -> Option<&str> {
        match self {
            TargetRef::State(id) => Some(id),
            TargetRef::Flow(_) => None,
        }
    }

    pub fn as_flow(&self) -> Option<&str> {
        match self {
            TargetRef::Flow(name) => Some(name),
            TargetRef::State(_) => None,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::State(id) => f.write_str(id),
            TargetRef::Flow(name) => write!(f, "{}{}", names::FLOW_PREFIX, name),
        }
    }
}

impl Serialize for TargetRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TargetRef::parse(&raw))
    }
}

/// 有序路由表
///
/// 保留声明顺序，保证 “先声明者优先” 的匹配语义
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<(String, TargetRef)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, target: TargetRef) -> Self {
        self.insert(key, target);
        self
    }

    /// 插入条目；重复的键覆盖原值但保留原位置
    pub fn insert(&mut self, key: impl Into<String>, target: TargetRef) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = target;
        } else {
            self.entries.push((key, target));
        }
    }

    pub fn get(&self, key: &str) -> Option<&TargetRef> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, target)| target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetRef)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetRef> {
        self.entries.iter().map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, target) in &self.entries {
            map.serialize_entry(key, target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RouteTableVisitor;

        impl<'de> Visitor<'de> for RouteTableVisitor {
            type Value = RouteTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of keys to target references")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut table = RouteTable::new();
                while let Some((key, target)) = access.next_entry::<String, TargetRef>()? {
                    table.insert(key, target);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(RouteTableVisitor)
    }
}

/// 数据收集动作
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectData {
    pub field: String,
    pub next_state: TargetRef,
}

/// 收集字段的类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectField<'a> {
    TrainClass,
    TrainNumber,
    Pnr,
    Generic(&'a str),
}

impl CollectData {
    pub fn kind(&self) -> CollectField<'_> {
        match self.field.as_str() {
            fields::TRAIN_CLASS => CollectField::TrainClass,
            fields::TRAIN_NUMBER => CollectField::TrainNumber,
            fields::PNR => CollectField::Pnr,
            other => CollectField::Generic(other),
        }
    }
}

fn default_dynamic_next() -> TargetRef {
    TargetRef::state(names::MAIN_MENU)
}

/// 动态响应动作
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicResponseAction {
    pub function: String,
    #[serde(default = "default_dynamic_next")]
    pub next_state: TargetRef,
}

/// 状态动作
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_data: Option<CollectData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_response: Option<DynamicResponseAction>,
}

/// 流程中的一个状态
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "RouteTable::is_empty")]
    pub transitions: RouteTable,
    #[serde(default, skip_serializing_if = "RouteTable::is_empty")]
    pub keypad_map: RouteTable,
    #[serde(default, skip_serializing_if = "RouteTable::is_empty")]
    pub speech_patterns: RouteTable,
    #[serde(default, skip_serializing_if = "RouteTable::is_empty")]
    pub keywords: RouteTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<StateActions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_input_message: Option<String>,
    #[serde(default)]
    pub is_end: bool,
}

impl State {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn collect_data(&self) -> Option<&CollectData> {
        self.actions.as_ref().and_then(|a| a.collect_data.as_ref())
    }

    pub fn dynamic_response(&self) -> Option<&DynamicResponseAction> {
        self.actions.as_ref().and_then(|a| a.dynamic_response.as_ref())
    }

    /// 所有路由表及动作中引用的目标
    pub fn targets(&self) -> impl Iterator<Item = &TargetRef> {
        let actions = self.actions.iter().flat_map(|a| {
            a.collect_data
                .iter()
                .map(|c| &c.next_state)
                .chain(a.dynamic_response.iter().map(|d| &d.next_state))
        });
        self.transitions
            .targets()
            .chain(self.keypad_map.targets())
            .chain(self.speech_patterns.targets())
            .chain(self.keywords.targets())
            .chain(actions)
    }
}

/// 流程定义
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub states: BTreeMap<String, State>,
}

impl FlowDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 空流程（缺失或加载失败的流程查找结果）
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.states.insert(state.id.clone(), state);
        self
    }

    pub fn with_initial_state(mut self, id: impl Into<String>) -> Self {
        self.initial_state = Some(id.into());
        self
    }

    /// 从 JSON 文本解析，`fallback_name` 用于补全缺失的流程名
    pub fn from_json_str(fallback_name: &str, content: &str) -> Result<Self> {
        let mut flow: FlowDefinition =
            serde_json::from_str(content).map_err(|e| IvrError::FlowParse {
                flow: fallback_name.to_string(),
                reason: e.to_string(),
            })?;
        if flow.name.is_empty() {
            flow.name = fallback_name.to_string();
        }
        for (id, state) in flow.states.iter_mut() {
            state.id = id.clone();
        }
        Ok(flow)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| IvrError::Other(e.into()))
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// 入口状态：initial_state，其次 `start`，最后 `main_menu`
    pub fn entry_state(&self) -> &str {
        if let Some(initial) = &self.initial_state {
            return initial;
        }
        if self.contains_state(names::START) {
            names::START
        } else {
            names::MAIN_MENU
        }
    }
}

/// 一次解释调用的结果
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub next: TargetRef,
    pub message: String,
    pub options: BTreeMap<String, String>,
    pub is_end: bool,
}

impl Step {
    /// 进入某个状态：使用该状态的提示语、选项与结束标记
    pub fn enter(id: &str, state: &State) -> Self {
        Self {
            next: TargetRef::state(id),
            message: state.message.clone(),
            options: state.options.clone(),
            is_end: state.is_end,
        }
    }

    /// 跨流程跳转，由外部编排者解析
    pub fn jump(flow: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            next: TargetRef::flow(flow),
            message: message.into(),
            options: BTreeMap::new(),
            is_end: false,
        }
    }

    pub fn stay(
        state_id: impl Into<String>,
        message: impl Into<String>,
        options: BTreeMap<String, String>,
    ) -> Self {
        Self {
            next: TargetRef::state(state_id),
            message: message.into(),
            options,
            is_end: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_ref_parses_flow_prefix() {
        assert_eq!(TargetRef::parse("flow:booking"), TargetRef::flow("booking"));
        assert_eq!(TargetRef::parse("main_menu"), TargetRef::state("main_menu"));
        assert_eq!(TargetRef::flow("status").to_string(), "flow:status");
    }

    #[test]
    fn route_table_keeps_declaration_order() {
        let json = r#"{"zeta": "a", "alpha": "flow:b", "mid": "c"}"#;
        let table: RouteTable = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.get("alpha"), Some(&TargetRef::flow("b")));
    }

    #[test]
    fn state_ids_are_filled_from_keys() {
        let json = r#"{"name": "demo", "states": {"main_menu": {"message": "hi"}}}"#;
        let flow = FlowDefinition::from_json_str("demo", json).unwrap();
        assert_eq!(flow.state("main_menu").unwrap().id, "main_menu");
        assert_eq!(flow.entry_state(), "main_menu");
    }

    #[test]
    fn dynamic_response_defaults_to_main_menu() {
        let json = r#"{"function": "train_status"}"#;
        let action: DynamicResponseAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.next_state, TargetRef::state("main_menu"));
    }

    #[test]
    fn malformed_flow_reports_parse_error() {
        let err = FlowDefinition::from_json_str("broken", "{ not json").unwrap_err();
        assert!(matches!(err, IvrError::FlowParse { ref flow, .. } if flow == "broken"));
    }
}
