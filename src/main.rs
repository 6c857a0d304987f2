use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};

use bbdown_panel::app::{AutoConfirm, Confirm, PanelController};
use bbdown_panel::common::api::{Endpoint, TaskClient};
use bbdown_panel::common::logger::PrettyLogger;
use bbdown_panel::config::PanelConfig;
use bbdown_panel::render::{detail_panel, render_dashboard};
use bbdown_panel::{log_info, log_success};

use crate::cli::Command;
use crate::console::{NotificationPrinter, print_dashboard};

mod cli;
mod console;

/// 从命令行参数生成配置
fn build_config(args: &cli::Cli) -> PanelConfig {
    PanelConfig {
        endpoint: Endpoint::from_input(&args.host, &args.port),
        auto_refresh: !args.no_auto_refresh,
        refresh_interval: Duration::from_secs(args.refresh_secs.max(1)),
        request_timeout: args.timeout.map(Duration::from_secs),
        ..PanelConfig::default()
    }
}

async fn write_html(path: &Path, html: &str) -> Result<()> {
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("写入 {:?} 失败", path))?;
    debug!("已写入 {:?}", path);
    Ok(())
}

/// 持续刷新，直到 Ctrl-C 或连接断开
async fn watch(controller: &PanelController, html: Option<&Path>) -> Result<()> {
    let mut printer = NotificationPrinter::default();
    let mut changes = controller.subscribe();
    let mut expire = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_printed = None;
    loop {
        let view = controller.view();
        printer.flush(controller);

        let listed = (
            view.connection.clone(),
            view.running.clone(),
            view.finished.clone(),
        );
        if last_printed.as_ref() != Some(&listed) {
            print_dashboard(&view);
            last_printed = Some(listed);
        }
        if let Some(path) = html {
            write_html(path, &render_dashboard(&view)).await?;
        }
        if !controller.is_connected() {
            bail!("连接已断开");
        }

        tokio::select! {
            _ = &mut ctrl_c => {
                info!("收到退出信号");
                controller.disconnect();
                return Ok(());
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = expire.tick() => {
                controller.expire_notifications();
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    let config = build_config(&args);
    let config_endpoint = config.endpoint.clone();
    let client = TaskClient::with_timeout(config.endpoint.clone(), config.request_timeout)?;
    let confirm: Arc<dyn Confirm> = if args.yes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(console::StdinConfirm)
    };
    let controller = PanelController::new(Arc::new(client), confirm, config);
    let mut printer = NotificationPrinter::default();

    // 只有 watch 需要定时刷新
    if !matches!(args.command, Command::Watch { .. }) {
        controller.set_auto_refresh(false);
    }

    PrettyLogger::waiting(format!("正在连接 {}", config_endpoint));
    let connected = controller.connect(&args.host, &args.port).await;
    printer.flush(&controller);
    if connected.is_err() || !controller.is_connected() {
        bail!("无法连接到 {}", controller.connection().base_url());
    }

    match args.command {
        Command::List => print_dashboard(&controller.view()),
        Command::Add { url, options } => {
            controller.update_form(|form| {
                form.url = url.clone();
                form.options = options;
            });
            let result = controller.add_task(&url).await;
            printer.flush(&controller);
            let ack = result?;
            debug!("服务器返回: {}", ack);
            print_dashboard(&controller.view());
        }
        Command::Remove { aid } => {
            let result = controller.remove_by_aid(&aid).await;
            printer.flush(&controller);
            if result? == 0 {
                log_info!("已取消");
            }
        }
        Command::RemoveFinished => {
            let result = controller.remove_all_finished().await;
            printer.flush(&controller);
            result?;
        }
        Command::RemoveFailed => {
            let result = controller.remove_all_failed().await;
            printer.flush(&controller);
            result?;
        }
        Command::Detail { aid, html } => {
            let result = controller.show_task_detail(&aid).await;
            printer.flush(&controller);
            let task = result?;
            match html {
                Some(path) => {
                    write_html(&path, &detail_panel(&task)).await?;
                    log_success!("详情已写入 {:?}", path);
                }
                None => println!("{}", serde_json::to_string_pretty(&task)?),
            }
        }
        Command::Watch { html } => watch(&controller, html.as_deref()).await?,
        Command::Render { html } => {
            write_html(&html, &render_dashboard(&controller.view())).await?;
            log_success!("仪表盘已写入 {:?}", html);
        }
    }

    Ok(())
}
