use std::path::PathBuf;

use bbdown_panel::app::TaskOptions;
use clap::{Parser, Subcommand};

/// BBDown 任务管理器
#[derive(Parser, Debug)]
#[command(name = "bbdown-panel")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "BBDown 任务服务器的控制面板", long_about = None)]
pub struct Cli {
    /// 服务器地址，留空时使用 localhost
    #[arg(long, global = true, value_name = "HOST", default_value = "")]
    pub host: String,

    /// 服务器端口，留空或非法时使用 58682
    #[arg(long, global = true, value_name = "PORT", default_value = "")]
    pub port: String,

    /// 跳过确认提示
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// 关闭自动刷新
    #[arg(long, global = true)]
    pub no_auto_refresh: bool,

    /// 自动刷新间隔（秒）
    #[arg(long, global = true, value_name = "SECONDS", default_value_t = 10)]
    pub refresh_secs: u64,

    /// 请求超时（秒），默认不限制
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 列出全部任务
    List,

    /// 添加下载任务
    Add {
        /// 视频链接
        #[arg(value_name = "URL", value_hint = clap::ValueHint::Url)]
        url: String,

        #[command(flatten)]
        options: TaskOptions,
    },

    /// 移除指定任务
    Remove {
        #[arg(value_name = "AID")]
        aid: String,
    },

    /// 移除所有已完成的任务
    RemoveFinished,

    /// 移除所有失败的任务
    RemoveFailed,

    /// 查看任务详情
    Detail {
        #[arg(value_name = "AID")]
        aid: String,

        /// 把详情页写入 HTML 文件
        #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        html: Option<PathBuf>,
    },

    /// 持续刷新任务列表，按 Ctrl-C 退出
    Watch {
        /// 每次刷新后写入仪表盘 HTML
        #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        html: Option<PathBuf>,
    },

    /// 刷新一次并写出仪表盘 HTML
    Render {
        #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        html: PathBuf,
    },
}
