use colored::*;

use crate::app::state::ConnectionState;
use crate::common::format::{format_bytes, format_speed, format_timestamp, truncate_title};
use crate::common::models::{Task, TaskBucket};
use crate::render::status_badge;
use crate::view::{Notification, NotificationLevel};

/// 终端输出工具
pub struct PrettyLogger;

impl PrettyLogger {
    /// 显示成功消息
    pub fn success(message: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), message.as_ref());
    }

    /// 显示信息消息
    pub fn info(message: impl AsRef<str>) {
        println!("{} {}", "ℹ".blue().bold(), message.as_ref());
    }

    /// 显示警告消息
    pub fn warning(message: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow().bold(), message.as_ref());
    }

    /// 显示错误消息
    pub fn error(message: impl AsRef<str>) {
        println!("{} {}", "✗".red().bold(), message.as_ref());
    }

    pub fn notification(notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => Self::success(&notification.message),
            NotificationLevel::Info => Self::info(&notification.message),
            NotificationLevel::Warning => Self::warning(&notification.message),
            NotificationLevel::Error => Self::error(&notification.message),
        }
    }

    pub fn connection(state: ConnectionState, address: impl AsRef<str>) {
        let status = match state {
            ConnectionState::Connected => "● 已连接".green().bold(),
            ConnectionState::Connecting => "● 连接中".yellow().bold(),
            ConnectionState::Disconnected => "● 未连接".red().bold(),
        };
        println!("{} {}", status, address.as_ref().bright_black());
    }

    /// 显示一行任务
    pub fn task_line(task: &Task) {
        let badge = status_badge(&task.status);
        let label = match badge.class {
            "running" => badge.label.cyan(),
            "completed" => badge.label.green(),
            "failed" => badge.label.red(),
            _ => badge.label.yellow(),
        };
        let tail = match task.bucket() {
            TaskBucket::Running => format_speed(task.speed),
            TaskBucket::Finished => format_timestamp(task.completed_at.as_ref()),
        };
        println!(
            "  {:<12} {} {:>6.1}% {:>12} {:>12}  {}",
            task.aid.bold(),
            label,
            task.progress,
            format_bytes(task.size),
            tail,
            truncate_title(task.title.as_deref())
        );
    }

    /// 显示分割线
    pub fn separator() {
        println!("{}", "─".repeat(50).bright_black());
    }

    /// 显示标题
    pub fn title(text: impl AsRef<str>) {
        let text = text.as_ref();
        let width = text.chars().count().min(48);
        let padding = (48 - width) / 2;
        println!(
            "{} {} {}",
            "─".repeat(padding).bright_black(),
            text.bold(),
            "─".repeat(48 - padding - width).bright_black()
        );
    }

    /// 显示等待消息
    pub fn waiting(message: impl AsRef<str>) {
        println!("{} {}", "⏳".yellow().bold(), message.as_ref());
    }
}

/// 便捷宏用于漂亮的日志输出
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::success(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::info(format!($($arg)*))
    };
}
