use std::fmt::Write;

use super::escape::escape_html;
use super::status::status_badge;
use crate::common::format::{
    PLACEHOLDER, format_bytes, format_progress, format_speed, format_timestamp, truncate_title,
};
use crate::common::models::{Task, TaskBucket};

/// 进度条，宽度限制在 0~100
pub fn progress_bar(progress: f64) -> String {
    let width = if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!(
        r#"<div class="progress-bar"><div class="progress-fill" style="width: {}%"></div></div><span>{}</span>"#,
        width,
        format_progress(progress)
    )
}

pub fn badge_html(task: &Task) -> String {
    let badge = status_badge(&task.status);
    format!(
        r#"<span class="status {}">{}</span>"#,
        badge.class,
        escape_html(&badge.label)
    )
}

fn actions_html(aid: &str) -> String {
    let aid = escape_html(aid);
    format!(
        r#"<button class="btn btn-secondary" data-action="detail" data-aid="{aid}" title="查看详情"><span class="icon">👁️</span></button><button class="btn btn-danger" data-action="remove" data-aid="{aid}" title="移除任务"><span class="icon">🗑️</span></button>"#
    )
}

/// 单个任务的表格行
///
/// 运行中列表显示速度，已完成列表显示完成时间。
pub fn task_row(task: &Task, bucket: TaskBucket) -> String {
    let aid = if task.aid.is_empty() {
        PLACEHOLDER
    } else {
        task.aid.as_str()
    };
    let full_title = task.title.as_deref().unwrap_or("");

    let mut row = String::from("<tr>");
    let _ = write!(row, "<td>{}</td>", escape_html(aid));
    let _ = write!(
        row,
        r#"<td class="task-title" title="{}">{}</td>"#,
        escape_html(full_title),
        escape_html(&truncate_title(task.title.as_deref()))
    );
    let _ = write!(row, "<td>{}</td>", format_timestamp(task.created_at.as_ref()));

    match bucket {
        TaskBucket::Running => {
            let _ = write!(row, "<td>{}</td>", progress_bar(task.progress));
            let _ = write!(row, "<td>{}</td>", format_speed(task.speed));
        }
        TaskBucket::Finished => {
            let _ = write!(
                row,
                "<td>{}</td>",
                format_timestamp(task.completed_at.as_ref())
            );
            let _ = write!(row, "<td>{}</td>", progress_bar(task.progress));
        }
    }

    let _ = write!(row, "<td>{}</td>", format_bytes(task.size));
    let _ = write!(row, "<td>{}</td>", badge_html(task));
    let _ = write!(row, "<td>{}</td>", actions_html(&task.aid));
    row.push_str("</tr>");
    row
}

/// 表格主体，任务为空时返回空字符串
pub fn table_body<'a>(tasks: impl IntoIterator<Item = &'a Task>, bucket: TaskBucket) -> String {
    tasks
        .into_iter()
        .map(|task| task_row(task, bucket))
        .collect::<Vec<_>>()
        .join("\n")
}
