//! 时间工具函数 - 业务时区转换
//!
//! Repositories only take `i64` Unix millis; conversion from calendar dates
//! happens here.

use chrono::NaiveDate;
use chrono_tz::Tz;

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地零点不存在，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 今天 (业务时区) 零点 → Unix millis
pub fn today_start_millis(tz: Tz) -> i64 {
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    day_start_millis(today, tz)
}
