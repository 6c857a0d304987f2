use std::time::Duration;

use tokio::time::Instant;

/// 通知默认显示时长
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn class(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
}

/// 通知队列
///
/// 通知是唯一面向用户的错误出口。超过显示时长后由 [`NotificationCenter::expire`]
/// 清理，也可以按 id 手动关闭（对应点击通知）。
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    next_id: u64,
    ttl: Duration,
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            next_id: 1,
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            created_at: Instant::now(),
        });
        id
    }

    /// 点击关闭
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// 清理已过期的通知，返回清理数量
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
        before - self.items.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    /// id 大于 `last_seen` 的通知
    pub fn since(&self, last_seen: u64) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(move |n| n.id > last_seen)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}
