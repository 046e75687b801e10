// 运行时模块 - 来电导航

mod navigator;

pub use navigator::{CallSession, CallSummary, IvrRuntime, Reply};
