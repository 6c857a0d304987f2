use std::io::{self, BufRead, Write};

use bbdown_panel::app::{Confirm, DashboardView, PanelController};
use bbdown_panel::common::logger::PrettyLogger;
use colored::Colorize;

/// 在终端里询问 y/N
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} {} [y/N] ", "?".cyan().bold(), prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// 只打印尚未显示过的通知
#[derive(Default)]
pub struct NotificationPrinter {
    last_seen: u64,
}

impl NotificationPrinter {
    pub fn flush(&mut self, controller: &PanelController) {
        let view = controller.view();
        let last_seen = self.last_seen;
        for notification in view.notifications.iter().filter(|n| n.id > last_seen) {
            PrettyLogger::notification(notification);
            self.last_seen = notification.id;
        }
    }
}

/// 终端渲染：连接状态加两个任务列表
pub fn print_dashboard(view: &DashboardView) {
    PrettyLogger::connection(view.connection.state, view.connection.base_url());

    PrettyLogger::title(format!("运行中的任务 ({})", view.running.len()));
    if view.running.is_empty() {
        println!("  {}", "暂无任务".bright_black());
    }
    for task in &view.running {
        PrettyLogger::task_line(task);
    }

    PrettyLogger::title(format!("已完成的任务 ({})", view.finished.len()));
    if view.finished.is_empty() {
        println!("  {}", "暂无任务".bright_black());
    }
    for task in &view.finished {
        PrettyLogger::task_line(task);
    }
    PrettyLogger::separator();
}
