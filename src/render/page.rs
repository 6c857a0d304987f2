use std::fmt::Write;

use super::detail::detail_panel;
use super::escape::escape_html;
use super::rows::table_body;
use crate::app::state::{ConnectionState, DashboardView};
use crate::common::models::{Task, TaskBucket};
use crate::view::{OptionGroup, Tab};

const RUNNING_HEADERS: [&str; 8] = ["AID", "标题", "创建时间", "进度", "速度", "大小", "状态", "操作"];
const FINISHED_HEADERS: [&str; 8] = [
    "AID", "标题", "创建时间", "完成时间", "进度", "大小", "状态", "操作",
];

/// 连接栏：状态指示、状态文字和连接按钮
pub fn connection_bar(view: &DashboardView) -> String {
    let (indicator, text, button, disabled) = match view.connection.state {
        ConnectionState::Disconnected => ("offline", "未连接", "🔗 连接", false),
        ConnectionState::Connecting => ("connecting", "连接中", "⏳ 连接中...", true),
        ConnectionState::Connected => ("online", "已连接", "🔗 已连接", false),
    };

    format!(
        r#"<div class="connection-bar"><span class="status-indicator {}"></span><span class="status-text">{}</span><span class="server-address">{}</span><button id="connect-btn" class="btn btn-primary"{}>{}</button><label><input type="checkbox" id="auto-refresh"{}> 自动刷新</label></div>"#,
        indicator,
        text,
        escape_html(&view.connection.base_url()),
        if disabled { " disabled" } else { "" },
        button,
        if view.auto_refresh { " checked" } else { "" },
    )
}

fn tab_headers(active: Tab) -> String {
    Tab::ALL
        .into_iter()
        .map(|tab| {
            format!(
                r#"<div class="tab-header{}" data-tab="{}">{}</div>"#,
                if tab == active { " active" } else { "" },
                tab.id(),
                tab.label()
            )
        })
        .collect()
}

fn task_table(id: &str, headers: &[&str], tasks: &[Task], bucket: TaskBucket) -> String {
    let mut out = String::new();
    let _ = write!(out, r#"<table id="{}-tasks-table"><thead><tr>"#, id);
    for header in headers {
        let _ = write!(out, "<th>{}</th>", header);
    }
    let _ = write!(
        out,
        "</tr></thead><tbody>{}</tbody></table>",
        table_body(tasks, bucket)
    );
    let _ = write!(
        out,
        r#"<div id="{}-empty" class="empty-state" style="display: {}">暂无任务</div>"#,
        id,
        if tasks.is_empty() { "block" } else { "none" }
    );
    out
}

fn option_groups(view: &DashboardView) -> String {
    OptionGroup::ALL
        .into_iter()
        .map(|group| {
            let expanded = if view.is_expanded(group) {
                " expanded"
            } else {
                ""
            };
            format!(
                r#"<div class="option-group"><div class="group-header{0}" data-group="{1}"><span class="toggle-icon">▶</span> {2}</div><div id="{1}-options" class="group-content{0}"></div></div>"#,
                expanded,
                group.id(),
                group.title()
            )
        })
        .collect()
}

fn tab_panel(tab: Tab, active: Tab, body: &str) -> String {
    format!(
        r#"<div id="{}" class="tab-content{}">{}</div>"#,
        tab.id(),
        if tab == active { " active" } else { "" },
        body
    )
}

fn notifications(view: &DashboardView) -> String {
    let items: String = view
        .notifications
        .iter()
        .map(|n| {
            format!(
                r#"<div class="notification {}" data-id="{}">{}</div>"#,
                n.level.class(),
                n.id,
                escape_html(&n.message)
            )
        })
        .collect();
    format!(r#"<div id="notification-container">{}</div>"#, items)
}

fn modal(view: &DashboardView) -> String {
    let (class, content) = match &view.modal {
        Some(task) => (" show", detail_panel(task)),
        None => ("", String::new()),
    };
    format!(
        r#"<div id="task-detail-modal" class="modal{}"><div class="modal-content"><span class="modal-close">&times;</span><div id="task-detail-content">{}</div></div></div>"#,
        class, content
    )
}

/// 渲染整个仪表盘页面
pub fn render_dashboard(view: &DashboardView) -> String {
    let dashboard = format!(
        "<h2>运行中的任务</h2>{}<h2>已完成的任务</h2>{}",
        task_table("running", &RUNNING_HEADERS, &view.running, TaskBucket::Running),
        task_table("finished", &FINISHED_HEADERS, &view.finished, TaskBucket::Finished),
    );
    let add_task = format!(
        r#"<input type="text" id="url-input" placeholder="视频URL"><button id="add-task-btn" class="btn btn-primary">添加任务</button>{}"#,
        option_groups(view)
    );
    let manage = concat!(
        r#"<button id="remove-all-btn" class="btn btn-danger">移除所有已完成任务</button>"#,
        r#"<button id="remove-failed-btn" class="btn btn-danger">移除失败任务</button>"#,
        r#"<input type="text" id="aid-input" placeholder="任务AID">"#,
        r#"<button id="remove-by-aid-btn" class="btn btn-danger">移除</button>"#,
    );

    let mut page = String::from("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head><meta charset=\"utf-8\"><title>BBDown 任务管理器</title></head>\n<body>\n");
    page.push_str(&connection_bar(view));
    page.push('\n');
    let _ = write!(page, r#"<div class="tabs">{}</div>"#, tab_headers(view.active_tab));
    page.push('\n');
    page.push_str(&tab_panel(Tab::Dashboard, view.active_tab, &dashboard));
    page.push_str(&tab_panel(Tab::AddTask, view.active_tab, &add_task));
    page.push_str(&tab_panel(Tab::Manage, view.active_tab, manage));
    page.push('\n');
    page.push_str(&notifications(view));
    page.push_str(&modal(view));
    let _ = write!(
        page,
        r#"<div id="loading-indicator" class="loading{}"></div>"#,
        if view.loading { " show" } else { "" }
    );
    page.push_str("\n</body>\n</html>\n");
    page
}
