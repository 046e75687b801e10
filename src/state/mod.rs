// 会话状态模块

mod session;

pub use session::Session;
