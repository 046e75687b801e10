use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::flow::constants::{names, prompt};
use crate::flow::{FlowDefinition, FlowInterpreter, FlowStore, Input, TargetRef};
use crate::state::Session;

/// 一通来电的导航状态，由调用方持有
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallSession {
    pub flow: String,
    pub state: String,
    pub session: Session,
    pub exchanges: u32,
    pub ended: bool,
}

/// 返回给来电者的一轮应答
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reply {
    pub flow: String,
    pub state: String,
    pub message: String,
    pub options: BTreeMap<String, String>,
    pub is_end: bool,
}

/// 通话结束摘要
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallSummary {
    pub total_exchanges: u32,
    pub final_flow: String,
    pub final_state: String,
    pub completed: bool,
    pub data: BTreeMap<String, String>,
}

/// 来电导航器
///
/// 在解释器之上解析跨流程跳转：从 FlowStore 取目标流程并进入其入口状态。
pub struct IvrRuntime {
    store: Arc<FlowStore>,
    interpreter: FlowInterpreter,
}

impl IvrRuntime {
    pub fn new(store: Arc<FlowStore>, interpreter: FlowInterpreter) -> Self {
        Self { store, interpreter }
    }

    pub fn store(&self) -> &FlowStore {
        &self.store
    }

    pub fn interpreter(&self) -> &FlowInterpreter {
        &self.interpreter
    }

    /// 开始通话：根流程主菜单
    pub fn start(&self) -> (CallSession, Reply) {
        let mut call = CallSession::default();
        let reply = self.enter_root(&mut call, "");
        (call, reply)
    }

    /// 处理一轮输入；每次输入最多跟随一次跨流程跳转
    pub fn handle_input(&self, call: &mut CallSession, raw: &str) -> Reply {
        let input = Input::from_raw(raw);
        let flow = self.store.get_or_empty(&call.flow);
        let step = self
            .interpreter
            .process_input(&flow, &call.state, &input, &mut call.session);
        call.exchanges += 1;

        let reply = match step.next {
            TargetRef::Flow(name) => self.enter_flow(call, &name, &step.message),
            TargetRef::State(id) if id == names::MAIN_MENU && !flow.contains_state(&id) => {
                self.enter_root(call, &step.message)
            }
            TargetRef::State(id) => {
                call.state = id;
                Reply {
                    flow: call.flow.clone(),
                    state: call.state.clone(),
                    message: step.message,
                    options: step.options,
                    is_end: step.is_end,
                }
            }
        };

        call.ended = reply.is_end;
        tracing::debug!(flow = %reply.flow, state = %reply.state, is_end = reply.is_end, "call advanced");
        reply
    }

    /// 结束通话并生成摘要
    pub fn end(&self, call: CallSession) -> CallSummary {
        CallSummary {
            total_exchanges: call.exchanges,
            final_flow: call.flow,
            final_state: call.state,
            completed: call.ended,
            data: call.session.data.into_iter().collect(),
        }
    }

    fn enter_flow(&self, call: &mut CallSession, name: &str, carried: &str) -> Reply {
        match self.store.get(name) {
            Some(flow) if flow.contains_state(flow.entry_state()) => {
                let entry = flow.entry_state().to_string();
                enter(call, name, &flow, entry, carried)
            }
            _ => {
                tracing::warn!(flow = %name, "jump target flow is not loaded");
                let carried = join_messages(carried, prompt::FLOW_UNAVAILABLE);
                self.enter_root(call, &carried)
            }
        }
    }

    fn enter_root(&self, call: &mut CallSession, carried: &str) -> Reply {
        let key = self.interpreter.root_flow();
        let root = self.store.get_or_empty(key);
        enter(call, key, &root, names::MAIN_MENU.to_string(), carried)
    }
}

/// `key` 是流程在 FlowStore 中的键，下一轮按它查找
fn enter(
    call: &mut CallSession,
    key: &str,
    flow: &FlowDefinition,
    state_id: String,
    carried: &str,
) -> Reply {
    let state = flow.state(&state_id);
    call.flow = key.to_string();
    call.state = state_id;
    Reply {
        flow: call.flow.clone(),
        state: call.state.clone(),
        message: join_messages(carried, state.map(|s| s.message.as_str()).unwrap_or_default()),
        options: state.map(|s| s.options.clone()).unwrap_or_default(),
        is_end: state.is_some_and(|s| s.is_end),
    }
}

fn join_messages(first: &str, second: &str) -> String {
    match (first.trim().is_empty(), second.trim().is_empty()) {
        (true, _) => second.to_string(),
        (false, true) => first.to_string(),
        (false, false) => format!("{first} {second}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_empty_parts() {
        assert_eq!(join_messages("", "Menu"), "Menu");
        assert_eq!(join_messages("Done.", ""), "Done.");
        assert_eq!(join_messages("Done.", "Menu"), "Done. Menu");
    }
}
