//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 和 reporting 层只接收 `i64` Unix millis。

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 当前 Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 日期 00:00:00 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// 把 Unix millis 格式化为业务时区的月份桶 "YYYY-MM"
pub fn month_bucket(millis: i64, tz: Tz) -> String {
    let dt = tz
        .timestamp_millis_opt(millis)
        .earliest()
        .unwrap_or_else(|| tz.timestamp_millis_opt(0).earliest().unwrap());
    format!("{:04}-{:02}", dt.year(), dt.month())
}

/// Calculate a `[start, end)` window in Unix millis from an API time range
///
/// Supported ranges: `today` / `week` / `month` / `custom` (with explicit
/// start/end dates) / `all`. Unknown values fall back to `all`.
pub fn calculate_time_range(
    time_range: &str,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    tz: Tz,
) -> AppResult<Option<(i64, i64)>> {
    let today = Utc::now().with_timezone(&tz).date_naive();

    let window = match time_range {
        "today" => Some((day_start_millis(today, tz), day_end_millis(today, tz))),
        "week" => {
            let weekday = today.weekday().num_days_from_monday();
            let week_start = today - Duration::days(weekday as i64);
            Some((day_start_millis(week_start, tz), day_end_millis(today, tz)))
        }
        "month" => {
            let month_start = today.with_day(1).unwrap_or(today);
            Some((day_start_millis(month_start, tz), day_end_millis(today, tz)))
        }
        "custom" => {
            if let (Some(s), Some(e)) = (custom_start, custom_end) {
                let start = parse_date(s)?;
                let end = parse_date(e)?;
                if end < start {
                    return Err(AppError::validation(format!(
                        "Invalid date range: {} .. {}",
                        s, e
                    )));
                }
                Some((day_start_millis(start, tz), day_end_millis(end, tz)))
            } else {
                None
            }
        }
        _ => None,
    };

    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bucket_utc() {
        // 2024-03-15T12:00:00Z
        let millis = 1_710_504_000_000;
        assert_eq!(month_bucket(millis, chrono_tz::UTC), "2024-03");
    }

    #[test]
    fn test_custom_range_rejects_inverted() {
        let err = calculate_time_range(
            "custom",
            Some("2024-05-01"),
            Some("2024-04-01"),
            chrono_tz::UTC,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_range_means_unbounded() {
        let window = calculate_time_range("all", None, None, chrono_tz::UTC).unwrap();
        assert!(window.is_none());
    }
}
