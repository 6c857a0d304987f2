use bbdown_panel::common::format::{
    format_bytes, format_progress, format_speed, format_timestamp, truncate_title,
};
use bbdown_panel::common::models::Timestamp;
use chrono::{Local, TimeZone, Utc};

#[test]
fn test_format_bytes_units() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(512), "512.00 B");
    assert_eq!(format_bytes(1024), "1.00 KB");
    assert_eq!(format_bytes(1536), "1.50 KB");
    assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    assert_eq!(format_bytes(2 * 1024u64.pow(4)), "2.00 TB");
    // 超过 TB 仍然使用 TB
    assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048.00 TB");
}

#[test]
fn test_format_bytes_unit_is_monotonic() {
    let units = ["B", "KB", "MB", "GB", "TB"];
    let unit_index = |s: String| {
        let unit = s.rsplit(' ').next().unwrap().to_string();
        units.iter().position(|u| *u == unit).unwrap()
    };

    let mut last = 0;
    let mut bytes = 1u64;
    while bytes < 1024u64.pow(5) {
        let idx = unit_index(format_bytes(bytes));
        assert!(idx >= last, "{} 字节的单位变小了", bytes);
        last = idx;
        bytes = bytes * 3 + 1;
    }
}

#[test]
fn test_format_speed() {
    assert_eq!(format_speed(None), "-");
    assert_eq!(format_speed(Some(0.0)), "-");
    assert_eq!(format_speed(Some(1536.0)), "1.50 KB/s");
    assert_eq!(format_speed(Some(2.0 * 1024.0 * 1024.0)), "2.00 MB/s");
}

#[test]
fn test_format_speed_keeps_fractional_rates() {
    assert_eq!(format_speed(Some(0.5)), "0.50 B/s");
    assert_eq!(format_speed(Some(1023.5)), "1023.50 B/s");
    assert_eq!(format_speed(Some(f64::NAN)), "-");
    assert_eq!(format_speed(Some(-3.0)), "-");
}

#[test]
fn test_format_timestamp() {
    assert_eq!(format_timestamp(None), "-");

    let local = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();
    let ts = Timestamp::from(local.with_timezone(&Utc));
    assert_eq!(format_timestamp(Some(&ts)), "2024/01/02 03:04:05");
}

#[test]
fn test_timestamp_parsing() {
    let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).single().unwrap();

    let from_str = Timestamp::parse("2024-05-06T07:08:09Z").unwrap();
    assert_eq!(from_str.as_datetime(), expected);

    let secs = expected.timestamp();
    let from_secs = Timestamp::from_value(&serde_json::json!(secs)).unwrap();
    assert_eq!(from_secs.as_datetime(), expected);

    let from_millis = Timestamp::from_value(&serde_json::json!(secs * 1000)).unwrap();
    assert_eq!(from_millis.as_datetime(), expected);

    assert!(Timestamp::parse("").is_none());
    assert!(Timestamp::parse("not a date").is_none());
    assert!(Timestamp::from_value(&serde_json::Value::Null).is_none());
}

#[test]
fn test_truncate_title() {
    let short = "短标题";
    assert_eq!(truncate_title(Some(short)), short);

    let exact: String = "a".repeat(50);
    assert_eq!(truncate_title(Some(&exact)), exact);

    let long: String = "字".repeat(51);
    let truncated = truncate_title(Some(&long));
    assert_eq!(truncated, format!("{}...", "字".repeat(50)));

    assert_eq!(truncate_title(None), "未知标题");
    assert_eq!(truncate_title(Some("")), "未知标题");
}

#[test]
fn test_format_progress() {
    assert_eq!(format_progress(0.0), "0.0%");
    assert_eq!(format_progress(45.67), "45.7%");
    assert_eq!(format_progress(100.0), "100.0%");
}
