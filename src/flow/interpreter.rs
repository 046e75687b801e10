use std::collections::BTreeMap;

use crate::flow::constants::{names, prompt, thresholds};
use crate::flow::types::{
    CollectField, DynamicResponseAction, FlowDefinition, State, Step, TargetRef,
};
use crate::nlp::{is_keypad_symbol, IntentClassifier, Recognition};
use crate::response::ResponseGenerator;
use crate::state::Session;

/// 按键到舱位的映射（仅用于 train_class 收集）
const KEYPAD_CLASSES: [(&str, &str); 3] = [("1", "Sleeper"), ("2", "AC"), ("3", "Tatkal")];

/// 来电输入：按键或语音转写文本
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Keypad(String),
    Speech(String),
}

impl Input {
    pub fn keypad(digit: impl Into<String>) -> Self {
        Input::Keypad(digit.into())
    }

    pub fn speech(text: impl Into<String>) -> Self {
        Input::Speech(text.into())
    }

    /// 单个 `0-9`、`*`、`#` 视为按键，其余视为语音
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_keypad_symbol(trimmed) {
            Input::Keypad(trimmed.to_string())
        } else {
            Input::Speech(trimmed.to_string())
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Input::Keypad(text) | Input::Speech(text) => text,
        }
    }

    pub fn is_keypad(&self) -> bool {
        matches!(self, Input::Keypad(_))
    }
}

/// 流程解释器
///
/// 根据当前状态与输入，按固定优先级逐层匹配，得出下一步。
/// 跨流程跳转原样返回，由外部编排者解析。
#[derive(Clone)]
pub struct FlowInterpreter {
    classifier: IntentClassifier,
    responses: ResponseGenerator,
    root_flow: String,
}

impl FlowInterpreter {
    pub fn new(classifier: IntentClassifier, responses: ResponseGenerator) -> Self {
        Self {
            classifier,
            responses,
            root_flow: names::ROOT_FLOW.to_string(),
        }
    }

    pub fn with_root_flow(mut self, root_flow: impl Into<String>) -> Self {
        self.root_flow = root_flow.into();
        self
    }

    pub fn root_flow(&self) -> &str {
        &self.root_flow
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// 处理一次输入，返回 (下一目标, 提示语, 选项, 是否结束)
    #[tracing::instrument(skip_all, fields(flow = %flow.name, state = current_state))]
    pub fn process_input(
        &self,
        flow: &FlowDefinition,
        current_state: &str,
        input: &Input,
        session: &mut Session,
    ) -> Step {
        let fallback = State::new(current_state, "");
        let state = flow.state(current_state).unwrap_or(&fallback);

        let routed = match input {
            Input::Keypad(digit) => self.route_keypad(flow, state, digit, session),
            Input::Speech(text) => self.route_speech(flow, current_state, state, text, session),
        };
        if let Some(step) = routed {
            return step;
        }

        if let Some(step) = self.run_actions(flow, state, input.text(), session) {
            return step;
        }

        self.invalid_input(current_state, state)
    }

    fn route_keypad(
        &self,
        flow: &FlowDefinition,
        state: &State,
        digit: &str,
        session: &mut Session,
    ) -> Option<Step> {
        if let Some(collect) = state.collect_data() {
            if collect.kind() == CollectField::TrainClass {
                if let Some((_, class)) = KEYPAD_CLASSES.iter().find(|(key, _)| *key == digit) {
                    session.set(collect.field.as_str(), *class);
                }
            }
            if let Some(step) = resolve(flow, &collect.next_state) {
                tracing::debug!(target_ref = %collect.next_state, "keypad collect action");
                return Some(step);
            }
        }

        if let Some(target) = state.keypad_map.get(digit) {
            tracing::debug!(target_ref = %target, "keypad map");
            return Some(follow_transition(flow, target));
        }

        if let Some(target) = state.transitions.get(digit) {
            tracing::debug!(target_ref = %target, "keypad transition");
            return Some(follow_transition(flow, target));
        }

        None
    }

    fn route_speech(
        &self,
        flow: &FlowDefinition,
        current_state: &str,
        state: &State,
        text: &str,
        session: &mut Session,
    ) -> Option<Step> {
        let recognition = self.classifier.extract_intent(text);

        if let Some(Recognition::Greeting(greeting)) = &recognition {
            return Some(Step::stay(
                current_state,
                greeting.response.clone(),
                state.options.clone(),
            ));
        }

        if let Some(collect) = state.collect_data() {
            let extracted = match collect.kind() {
                CollectField::TrainClass => self.classifier.extract_class_from_speech(text),
                CollectField::TrainNumber => self.classifier.extract_train_number(text),
                CollectField::Pnr => self.classifier.extract_pnr(text),
                CollectField::Generic(_) => None,
            };
            if let Some(value) = extracted {
                session.set(collect.field.as_str(), value);
                let next = collect
                    .next_state
                    .as_state()
                    .and_then(|id| flow.state(id).map(|next| Step::enter(id, next)));
                if let Some(step) = next {
                    tracing::debug!(field = %collect.field, "entity collected from speech");
                    return Some(step);
                }
            }
        }

        if let Some(intent) = recognition.as_ref().and_then(Recognition::as_intent) {
            if intent.confidence > thresholds::INTENT_CONFIDENCE {
                tracing::debug!(intent = %intent.intent, confidence = intent.confidence, "intent route");
                return Some(follow_transition(flow, &intent.target));
            }
        }

        if let Some((keyword, target)) = state.keywords.iter().find(|(k, _)| text.contains(k)) {
            tracing::debug!(keyword, "keyword route");
            return Some(follow_transition(flow, target));
        }

        if let Some((pattern, target)) = state
            .speech_patterns
            .iter()
            .find(|(p, _)| text.contains(p))
        {
            tracing::debug!(pattern, "speech pattern route");
            return Some(follow_transition(flow, target));
        }

        if let Some((pattern, target)) = state.speech_patterns.iter().find(|(p, _)| {
            self.classifier.similarity(text, p) > thresholds::PARTIAL_SPEECH_PATTERN
        }) {
            tracing::debug!(pattern, "partial speech pattern route");
            return Some(follow_transition(flow, target));
        }

        None
    }

    /// 通用数据收集与动态响应
    fn run_actions(
        &self,
        flow: &FlowDefinition,
        state: &State,
        raw: &str,
        session: &mut Session,
    ) -> Option<Step> {
        if let Some(collect) = state.collect_data() {
            if let CollectField::Generic(field) = collect.kind() {
                session.set(field, raw);
                if let Some(step) = resolve(flow, &collect.next_state) {
                    tracing::debug!(field, "raw input collected");
                    return Some(step);
                }
            }
        }

        state
            .dynamic_response()
            .map(|action| self.dynamic_response(flow, action, raw, session))
    }

    fn dynamic_response(
        &self,
        flow: &FlowDefinition,
        action: &DynamicResponseAction,
        raw: &str,
        session: &Session,
    ) -> Step {
        let message = self
            .responses
            .generate_by_name(&action.function, session, raw);

        match &action.next_state {
            TargetRef::State(id) if id == names::MAIN_MENU && flow.name != self.root_flow => {
                Step::jump(self.root_flow.clone(), message)
            }
            TargetRef::Flow(name) => Step::jump(name.clone(), message),
            TargetRef::State(id) => match flow.state(id) {
                Some(next) => Step {
                    next: TargetRef::state(id.clone()),
                    message,
                    options: next.options.clone(),
                    is_end: next.is_end,
                },
                None => Step::stay(
                    names::MAIN_MENU,
                    message,
                    flow.state(names::MAIN_MENU)
                        .map(|s| s.options.clone())
                        .unwrap_or_default(),
                ),
            },
        }
    }

    fn invalid_input(&self, current_state: &str, state: &State) -> Step {
        if current_state == names::MAIN_MENU {
            return Step::stay(
                current_state,
                prompt::MAIN_MENU_RECOVERY,
                state.options.clone(),
            );
        }

        let mut message = state
            .invalid_input_message
            .clone()
            .unwrap_or_else(|| prompt::DEFAULT_RECOVERY.to_string());
        if let Some(collect) = state.collect_data() {
            let hint = match collect.kind() {
                CollectField::TrainNumber => prompt::HINT_TRAIN_NUMBER,
                CollectField::Pnr => prompt::HINT_PNR,
                CollectField::TrainClass => prompt::HINT_TRAIN_CLASS,
                CollectField::Generic(_) => "",
            };
            message.push_str(hint);
        }

        Step::stay(current_state, message, state.options.clone())
    }
}

/// 跟随跳转目标；流程内不存在的状态软失败回到主菜单
pub fn follow_transition(flow: &FlowDefinition, target: &TargetRef) -> Step {
    resolve(flow, target).unwrap_or_else(|| {
        tracing::warn!(flow = %flow.name, target_ref = %target, "invalid navigation target");
        Step {
            next: TargetRef::state(names::MAIN_MENU),
            message: prompt::INVALID_NAVIGATION.to_string(),
            options: BTreeMap::new(),
            is_end: false,
        }
    })
}

/// 跨流程目标原样返回；已知状态进入该状态；未知状态返回 None
fn resolve(flow: &FlowDefinition, target: &TargetRef) -> Option<Step> {
    match target {
        TargetRef::Flow(name) => Some(Step::jump(name.clone(), "")),
        TargetRef::State(id) => flow.state(id).map(|state| Step::enter(id, state)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::types::{CollectData, RouteTable, StateActions};

    fn interpreter() -> FlowInterpreter {
        FlowInterpreter::new(IntentClassifier::default(), ResponseGenerator::default())
    }

    fn demo_flow() -> FlowDefinition {
        let mut menu = State::new("main_menu", "Welcome");
        menu.keypad_map = RouteTable::new().with("1", TargetRef::state("ask_date"));
        menu.transitions = RouteTable::new().with("9", TargetRef::state("nowhere"));

        let mut ask_date = State::new("ask_date", "Which date?");
        ask_date.actions = Some(StateActions {
            collect_data: Some(CollectData {
                field: "travel_date".into(),
                next_state: TargetRef::state("ask_name"),
            }),
            dynamic_response: None,
        });

        let mut ask_name = State::new("ask_name", "Your name?");
        ask_name.actions = Some(StateActions {
            collect_data: Some(CollectData {
                field: "passenger".into(),
                next_state: TargetRef::state("main_menu"),
            }),
            dynamic_response: None,
        });

        FlowDefinition::new("demo")
            .with_state(menu)
            .with_state(ask_date)
            .with_state(ask_name)
    }

    #[test]
    fn invalid_transition_soft_fails_to_main_menu() {
        let step = interpreter().process_input(
            &demo_flow(),
            "main_menu",
            &Input::keypad("9"),
            &mut Session::new(),
        );
        assert_eq!(step.next, TargetRef::state("main_menu"));
        assert_eq!(step.message, prompt::INVALID_NAVIGATION);
    }

    #[test]
    fn generic_collect_surfaces_next_question() {
        let mut session = Session::new();
        let step = interpreter().process_input(
            &demo_flow(),
            "ask_date",
            &Input::speech("the twelfth of march"),
            &mut session,
        );
        assert_eq!(session.get("travel_date"), Some("the twelfth of march"));
        assert_eq!(step.next, TargetRef::state("ask_name"));
        assert_eq!(step.message, "Your name?");
    }

    #[test]
    fn unknown_state_behaves_as_empty_state() {
        let step = interpreter().process_input(
            &demo_flow(),
            "ghost",
            &Input::keypad("5"),
            &mut Session::new(),
        );
        assert_eq!(step.next, TargetRef::state("ghost"));
        assert_eq!(step.message, prompt::DEFAULT_RECOVERY);
        assert!(!step.is_end);
    }

    #[test]
    fn input_kind_from_raw_text() {
        assert!(Input::from_raw(" 5 ").is_keypad());
        assert!(Input::from_raw("#").is_keypad());
        assert!(!Input::from_raw("12718").is_keypad());
        assert!(!Input::from_raw("book").is_keypad());
    }
}
