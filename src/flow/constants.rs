//! 流程相关的常量定义
//!
//! 统一管理流程名、状态名、字段名、匹配阈值和固定提示语

/// 流程与状态名常量
pub mod names {
    /// 根流程（主菜单所在流程）
    pub const ROOT_FLOW: &str = "train_main";
    /// 主菜单状态
    pub const MAIN_MENU: &str = "main_menu";
    /// 未声明 initial_state 时的入口状态
    pub const START: &str = "start";
    /// 跨流程跳转前缀
    pub const FLOW_PREFIX: &str = "flow:";
}

/// 会话数据字段名常量
pub mod fields {
    pub const TRAIN_CLASS: &str = "train_class";
    pub const TRAIN_NUMBER: &str = "train_number";
    pub const PNR: &str = "pnr";
    pub const CLASS: &str = "class";
    pub const TRAVEL_DATE: &str = "travel_date";
    pub const SOURCE_STATION: &str = "source_station";
    pub const DESTINATION_STATION: &str = "destination_station";
}

/// 匹配阈值（固定启发式常量，调用方不可覆盖）
pub mod thresholds {
    /// 意图接受阈值
    pub const INTENT_ACCEPT: f64 = 0.6;
    /// 关键词模糊匹配阈值
    pub const FUZZY_KEYWORD: f64 = 0.7;
    /// 参与模糊匹配的关键词最小长度（严格大于）
    pub const FUZZY_MIN_KEYWORD_LEN: usize = 4;
    /// 解释器采纳意图所需的置信度
    pub const INTENT_CONFIDENCE: f64 = 0.7;
    /// 上下文加权系数
    pub const CONTEXT_BOOST: f64 = 1.2;
    /// 语音短语部分匹配阈值
    pub const PARTIAL_SPEECH_PATTERN: f64 = 0.6;
}

/// 固定提示语
pub mod prompt {
    pub const INVALID_NAVIGATION: &str = "Invalid navigation. Returning to main menu.";

    pub const MAIN_MENU_RECOVERY: &str = "I'm sorry, I didn't quite catch that. No worries! Let me help you: You can say things like 'book a ticket', 'check train status', 'schedule', 'cancel ticket', 'PNR status', 'seat availability', 'fare enquiry', 'trains between stations', or 'speak to agent'. Or you can press any number from 0 to 9 on the keypad. What would you like to do?";

    pub const DEFAULT_RECOVERY: &str = "I didn't quite understand that. Could you please try again? You can also say 'go back' or 'main menu' to return to the main menu, or press star on the keypad.";

    pub const HINT_TRAIN_NUMBER: &str = " Please provide a 5-digit train number.";
    pub const HINT_PNR: &str = " Please provide your 10-digit PNR number.";
    pub const HINT_TRAIN_CLASS: &str =
        " You can say 'Sleeper', 'AC', or 'Tatkal', or press 1, 2, or 3.";

    pub const FLOW_UNAVAILABLE: &str =
        "I'm sorry, that service is not available right now. Let me take you back to the main menu.";

    pub const PROCESSING: &str = "I'm processing your request. Please give me a moment...";
}
