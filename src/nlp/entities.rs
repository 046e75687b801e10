use once_cell::sync::Lazy;
use regex::Regex;

static TRAIN_NUMBER_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{5}\b").expect("valid train number regex"));
static TRAIN_NUMBER_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4,6}\b").expect("valid train number regex"));
static PNR_EXACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{10}\b").expect("valid pnr regex"));
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));

/// 提取车次号：优先 5 位数字，其次 4-6 位数字
pub fn extract_train_number(text: &str) -> Option<String> {
    TRAIN_NUMBER_EXACT
        .find(text)
        .or_else(|| TRAIN_NUMBER_LOOSE.find(text))
        .map(|m| m.as_str().to_string())
}

/// 提取 PNR：10 位数字；若文本含 “pnr” 则退而取第一段数字
pub fn extract_pnr(text: &str) -> Option<String> {
    if let Some(m) = PNR_EXACT.find(text) {
        return Some(m.as_str().to_string());
    }
    if text.to_lowercase().contains("pnr") {
        return DIGIT_RUN.find(text).map(|m| m.as_str().to_string());
    }
    None
}

/// 从语音文本中识别舱位
///
/// `mappings` 按短语长度降序匹配，避免 “ac” 抢先命中 “ac 3”
pub fn extract_class(text: &str, mappings: &[(String, String)]) -> Option<String> {
    let lower = text.to_lowercase();

    let mut ordered: Vec<&(String, String)> = mappings.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    if let Some((_, class)) = ordered.iter().find(|(phrase, _)| lower.contains(phrase.as_str())) {
        return Some(class.clone());
    }

    let fallbacks = [
        (["1", "one", "first"], "Sleeper"),
        (["2", "two", "second"], "AC"),
        (["3", "three", "third"], "Tatkal"),
    ];
    fallbacks
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, class)| class.to_string())
}
