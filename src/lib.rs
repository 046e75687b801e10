pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod nlp;
pub mod response;
pub mod runtime;
pub mod state;
pub mod utils;

pub use cli::{build_classifier, build_runtime, flow_summaries, FlowSummaryEntry};
pub use config::{EnvConfig, IvrSettings};
pub use error::{IvrError, Result};
pub use flow::{
    follow_transition, CollectData, DirectorySource, DynamicResponseAction, FlowDefinition,
    FlowInterpreter, FlowSource, FlowStore, Input, MemorySource, RouteTable, State, StateActions,
    Step, TargetRef, DEFAULT_FLOW_NAMES,
};
pub use nlp::{
    similarity, ClassifierConfig, ContextAnalysis, GreetingKind, GreetingReply, IntentClassifier,
    IntentMatch, IntentPattern, Recognition,
};
pub use response::{DynamicFunction, ReservationBackend, ResponseGenerator, SimulatedBackend};
pub use runtime::{CallSession, CallSummary, IvrRuntime, Reply};
pub use state::Session;
pub use utils::{logging, validation, FlowIssue, FlowValidator, LoggingConfig};
