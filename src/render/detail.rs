use std::fmt::Write;

use super::escape::escape_html;
use super::rows::{badge_html, progress_bar};
use crate::common::format::{
    PLACEHOLDER, UNKNOWN_TITLE, format_bytes, format_speed, format_timestamp,
};
use crate::common::models::Task;

fn detail_row(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        r#"<div class="detail-row"><strong>{}:</strong> {}</div>"#,
        label, value
    );
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// 任务详情面板，错误信息和输出路径只在存在时显示
pub fn detail_panel(task: &Task) -> String {
    let mut out = String::from(r#"<div class="task-detail">"#);

    let aid = if task.aid.is_empty() {
        PLACEHOLDER
    } else {
        task.aid.as_str()
    };
    detail_row(&mut out, "AID", &escape_html(aid));

    let title = present(&task.title).unwrap_or(UNKNOWN_TITLE);
    detail_row(&mut out, "标题", &escape_html(title));

    let link = match present(&task.url) {
        Some(url) => format!(
            r#"<a href="{0}" target="_blank">{0}</a>"#,
            escape_html(url)
        ),
        None => format!(r##"<a href="#" target="_blank">{}</a>"##, PLACEHOLDER),
    };
    detail_row(&mut out, "URL", &link);

    detail_row(&mut out, "状态", &badge_html(task));
    detail_row(&mut out, "进度", &progress_bar(task.progress));
    detail_row(&mut out, "下载速度", &format_speed(task.speed));
    detail_row(&mut out, "文件大小", &format_bytes(task.size));
    detail_row(&mut out, "创建时间", &format_timestamp(task.created_at.as_ref()));
    detail_row(&mut out, "完成时间", &format_timestamp(task.completed_at.as_ref()));

    if let Some(message) = present(&task.error_message) {
        detail_row(
            &mut out,
            "错误信息",
            &format!(r#"<div class="error-message">{}</div>"#, escape_html(message)),
        );
    }
    if let Some(path) = present(&task.output_path) {
        detail_row(&mut out, "输出路径", &escape_html(path));
    }

    out.push_str("</div>");
    out
}
