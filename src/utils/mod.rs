/// 工具模块 - 日志初始化与流程校验
pub mod logging;
pub mod validation;

pub use logging::LoggingConfig;
pub use validation::{FlowIssue, FlowValidator};
