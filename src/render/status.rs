use std::borrow::Cow;

use crate::common::models::TaskStatus;

/// 状态徽章的样式和文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge<'a> {
    pub class: &'static str,
    pub label: Cow<'a, str>,
}

/// 查表得到徽章，未知状态使用 pending 样式并显示原始状态
pub fn status_badge(status: &TaskStatus) -> StatusBadge<'_> {
    let (class, label) = match status {
        TaskStatus::Running => ("running", "运行中"),
        TaskStatus::Downloading => ("running", "下载中"),
        TaskStatus::Pending => ("pending", "等待中"),
        TaskStatus::Completed => ("completed", "已完成"),
        TaskStatus::Failed => ("failed", "失败"),
        TaskStatus::Cancelled => ("failed", "已取消"),
        TaskStatus::Other(raw) => {
            return StatusBadge {
                class: "pending",
                label: Cow::Borrowed(raw.as_str()),
            };
        }
    };
    StatusBadge {
        class,
        label: Cow::Borrowed(label),
    }
}
