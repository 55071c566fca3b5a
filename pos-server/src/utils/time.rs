//! 时间工具函数 (业务时区转换)
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format(format!("Invalid date format: {date} (expected YYYY-MM-DD)")))
}

/// 解析时间字符串 (HH:MM 或 HH:MM:SS)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| AppError::invalid_format(format!("Invalid time format: {time} (expected HH:MM)")))
}

/// 日期 + 时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_time_to_millis(date, NaiveTime::MIN, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Unix millis → 本地小时 0..=23 (业务时区)
pub fn local_hour(millis: i64, tz: Tz) -> Option<u32> {
    tz.timestamp_millis_opt(millis).single().map(|dt| dt.hour())
}

/// 当前日期 (业务时区)
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("19:30").unwrap(), NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(parse_time("07:05:09").unwrap(), NaiveTime::from_hms_opt(7, 5, 9).unwrap());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_day_bounds_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_start_millis(date, chrono_tz::UTC), 1_704_067_200_000);
        assert_eq!(
            day_end_millis(date, chrono_tz::UTC) - day_start_millis(date, chrono_tz::UTC),
            86_400_000
        );
    }

    #[test]
    fn test_day_bounds_follow_timezone() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // Mexico City is UTC-6 in January
        let tz: Tz = "America/Mexico_City".parse().unwrap();
        assert_eq!(
            day_start_millis(date, tz),
            1_704_067_200_000 + 6 * 3_600_000
        );
    }

    #[test]
    fn test_local_hour() {
        // 2024-01-01 13:30 UTC
        let millis = 1_704_067_200_000 + 13 * 3_600_000 + 30 * 60_000;
        assert_eq!(local_hour(millis, chrono_tz::UTC), Some(13));
        let tz: Tz = "America/Mexico_City".parse().unwrap();
        assert_eq!(local_hour(millis, tz), Some(7));
    }
}
