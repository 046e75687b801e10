use thiserror::Error;

use crate::flow::constants::names;
use crate::flow::{FlowDefinition, TargetRef};
use crate::response::DynamicFunction;

/// 流程静态检查发现的问题（仅作警告，不阻止加载）
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowIssue {
    #[error("entry state `{0}` is not defined")]
    MissingEntryState(String),
    #[error("state `{state}` references unknown state `{target}`")]
    UnknownState { state: String, target: String },
    #[error("state `{state}` jumps to unloaded flow `{flow}`")]
    UnknownFlow { state: String, flow: String },
    #[error("state `{state}` uses unknown dynamic function `{function}`")]
    UnknownFunction { state: String, function: String },
}

/// 流程验证器
pub struct FlowValidator;

impl FlowValidator {
    /// 检查入口状态、跳转目标与动态函数名
    pub fn validate(flow: &FlowDefinition, known_flows: &[&str]) -> Vec<FlowIssue> {
        let mut issues = Vec::new();

        if flow.is_empty() {
            return issues;
        }

        let entry = flow.entry_state();
        if !flow.contains_state(entry) {
            issues.push(FlowIssue::MissingEntryState(entry.to_string()));
        }

        for (id, state) in &flow.states {
            for target in state.targets() {
                match target {
                    TargetRef::State(target) if !flow.contains_state(target) => {
                        // 非根流程回主菜单由解释器改写为跨流程跳转
                        let redirected = target == names::MAIN_MENU
                            && state
                                .dynamic_response()
                                .is_some_and(|d| d.next_state == TargetRef::state(names::MAIN_MENU));
                        if !redirected {
                            issues.push(FlowIssue::UnknownState {
                                state: id.clone(),
                                target: target.clone(),
                            });
                        }
                    }
                    TargetRef::Flow(name) if !known_flows.contains(&name.as_str()) => {
                        issues.push(FlowIssue::UnknownFlow {
                            state: id.clone(),
                            flow: name.clone(),
                        });
                    }
                    _ => {}
                }
            }

            if let Some(action) = state.dynamic_response() {
                if action.function.parse::<DynamicFunction>().is_err() {
                    issues.push(FlowIssue::UnknownFunction {
                        state: id.clone(),
                        function: action.function.clone(),
                    });
                }
            }
        }

        issues
    }
}
