/// 字符串相似度（Ratcliff/Obershelp 匹配块比率）
///
/// 比率为 `2 * M / T`：M 为递归求得的最长公共匹配块字符总数，T 为两串字符总数。
/// 比较前统一转小写，并按字典序固定参数顺序，保证结果对称。
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (first, second) = if a <= b { (&a, &b) } else { (&b, &a) };
    ratio(first, second)
}

/// 按给定顺序计算比率（不做大小写归一）
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_characters(&a, &b);
    2.0 * matches as f64 / total as f64
}

/// 递归匹配块的字符总数
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// 区间内最长公共子串，长度相同时取 a 中最早、其次 b 中最早者
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j - blo + 1]：以 a[i-1]、b[j] 结尾的公共后缀长度
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut curr = vec![0usize; width];
    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[slot - 1] + 1;
                curr[slot] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            } else {
                curr[slot] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("booking", "booking"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("Status", "status"), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn ratio_matches_reference_values() {
        // abcd / bcde share "bcd": 2 * 3 / 8
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        // "schedule" vs "shedule": 2 * 7 / 15
        assert!((ratio("schedule", "shedule") - 14.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_is_symmetric() {
        let pairs = [
            ("train status", "status"),
            ("book a ticket", "booking"),
            ("abxcd", "abcd"),
            ("cancel my ticket", "cancellation"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} vs {b}");
        }
    }
}
