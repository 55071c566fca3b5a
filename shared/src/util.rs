/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 两个毫秒时间戳之间的分钟数，保留一位小数
///
/// `end < start` 时返回 `None`。
pub fn minutes_between(start: i64, end: i64) -> Option<f64> {
    if end < start {
        return None;
    }
    let minutes = (end - start) as f64 / 60_000.0;
    Some((minutes * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_between_rounds_to_one_decimal() {
        assert_eq!(minutes_between(0, 90_000), Some(1.5));
        assert_eq!(minutes_between(0, 100_000), Some(1.7));
        assert_eq!(minutes_between(1_000, 1_000), Some(0.0));
    }

    #[test]
    fn test_minutes_between_rejects_reversed_range() {
        assert_eq!(minutes_between(60_000, 0), None);
    }
}
