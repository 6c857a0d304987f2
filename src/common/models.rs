use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// -----------------------------------------------------------------------------------------------

/// 服务器返回的下载任务
///
/// 字段名沿用服务器的 PascalCase 写法。服务器偶尔会返回 `null` 或类型不一致的字段，
/// 这里统一做宽松解析，解析不了的字段取默认值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(rename = "AID", default, deserialize_with = "lenient::aid")]
    pub aid: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient::number")]
    pub progress: f64,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::size")]
    pub size: u64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub completed_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub output_path: Option<String>,
}

impl Task {
    pub fn bucket(&self) -> TaskBucket {
        self.status.bucket()
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Downloading,
    Completed,
    Failed,
    Cancelled,
    Other(String), // 服务器返回了未知状态，保留原文
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Running => "Running",
            TaskStatus::Downloading => "Downloading",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
            TaskStatus::Cancelled => "Cancelled",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// 任务所在的列表，未知状态视为未完成
    pub fn bucket(&self) -> TaskBucket {
        match self {
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled => {
                TaskBucket::Finished
            }
            _ => TaskBucket::Running,
        }
    }

    /// 失败或被取消
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Cancelled)
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Pending" => TaskStatus::Pending,
            "Running" => TaskStatus::Running,
            "Downloading" => TaskStatus::Downloading,
            "Completed" => TaskStatus::Completed,
            "Failed" => TaskStatus::Failed,
            "Cancelled" => TaskStatus::Cancelled,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        TaskStatus::from(raw.to_string())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => TaskStatus::from(s),
            Value::Null => TaskStatus::default(),
            other => TaskStatus::Other(other.to_string()),
        })
    }
}

// -----------------------------------------------------------------------------------------------

/// 仪表盘上的两个列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskBucket {
    Running,  // 等待中、运行中、下载中
    Finished, // 已完成、失败、已取消
}

/// 按状态把任务分到两个列表，保持原有顺序
pub fn partition_tasks(tasks: &[Task]) -> (Vec<&Task>, Vec<&Task>) {
    tasks
        .iter()
        .partition(|task| task.bucket() == TaskBucket::Running)
}

pub fn finished_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.bucket() == TaskBucket::Finished)
        .collect()
}

pub fn failed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.status.is_failed()).collect()
}

// -----------------------------------------------------------------------------------------------

/// 服务器时间戳
///
/// 服务器可能返回 RFC 3339 字符串，也可能返回 Unix 时间（秒或毫秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

// 小于这个值的数字按秒处理，否则按毫秒
const MILLIS_THRESHOLD: f64 = 1e11;

impl Timestamp {
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Self::from_unix(n.as_f64()?),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        // 没有时区的 ISO 时间按 UTC 处理
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Self(Utc.from_utc_datetime(&naive)));
        }
        raw.parse::<f64>().ok().and_then(Self::from_unix)
    }

    fn from_unix(value: f64) -> Option<Self> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let millis = if value < MILLIS_THRESHOLD {
            (value * 1000.0) as i64
        } else {
            value as i64
        };
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

// -----------------------------------------------------------------------------------------------

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Timestamp;

    pub fn aid<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(opt_number(d)?.unwrap_or_default())
    }

    pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn size<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(opt_number(d)?
            .filter(|v| *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or_default())
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Timestamp>, D::Error> {
        Ok(Timestamp::from_value(&Value::deserialize(d)?))
    }
}

// -----------------------------------------------------------------------------------------------

/// 创建任务时附带的选项，键名原样发送给服务器
pub type OptionSet = serde_json::Map<String, Value>;
