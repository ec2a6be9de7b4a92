//! Timestamp helpers: ISO-8601 strings that sort lexicographically

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// 格式化为 ISO-8601（UTC、毫秒精度、`Z` 后缀），如 `2024-05-01T10:20:30.123Z`
///
/// 统一格式保证字符串比较与时间先后一致
pub fn iso8601(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 文件系统时间转 ISO-8601
pub fn iso8601_from_system(t: SystemTime) -> String {
    iso8601(DateTime::<Utc>::from(t))
}

/// 文件名安全的时间戳：`:` 与 `.` 替换为 `-`
pub fn filename_stamp(t: DateTime<Utc>) -> String {
    iso8601(t).replace([':', '.'], "-")
}
