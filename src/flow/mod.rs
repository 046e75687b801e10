// Flow 模块 - 流程定义、缓存与解释

pub mod constants;
pub mod interpreter;
pub mod store;
pub mod types;

// 重新导出核心类型
pub use interpreter::{follow_transition, FlowInterpreter, Input};
pub use store::{DirectorySource, FlowSet, FlowSource, FlowStore, MemorySource, DEFAULT_FLOW_NAMES};
pub use types::{
    CollectData, CollectField, DynamicResponseAction, FlowDefinition, RouteTable, State,
    StateActions, Step, TargetRef,
};
