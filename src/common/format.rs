use chrono::Local;

use super::models::Timestamp;

/// 占位符，字段缺失时显示
pub const PLACEHOLDER: &str = "-";

/// 标题截断长度（按字符计）
pub const TITLE_MAX_CHARS: usize = 50;

/// 标题缺失时显示的文字
pub const UNKNOWN_TITLE: &str = "未知标题";

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 字节数转换为可读字符串，如 `1536 -> "1.50 KB"`
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    scale(bytes as f64)
}

// 按 1024 逐级换算，保留两位小数
fn scale(mut value: f64) -> String {
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

/// 格式化时间，使用本地时区，格式与 zh-CN 区域一致
pub fn format_timestamp(timestamp: Option<&Timestamp>) -> String {
    match timestamp {
        Some(ts) => ts
            .as_datetime()
            .with_timezone(&Local)
            .format("%Y/%m/%d %H:%M:%S")
            .to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// 格式化下载速度，缺失或为 0 时显示占位符
pub fn format_speed(bytes_per_second: Option<f64>) -> String {
    match bytes_per_second {
        Some(speed) if speed.is_finite() && speed > 0.0 => format!("{}/s", scale(speed)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// 进度百分比，保留一位小数
pub fn format_progress(progress: f64) -> String {
    format!("{:.1}%", progress)
}

/// 截断过长的标题
///
/// 不超过 50 个字符时原样返回，否则保留前 50 个字符并追加 `...`。
pub fn truncate_title(title: Option<&str>) -> String {
    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return UNKNOWN_TITLE.to_string(),
    };

    match title.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}
