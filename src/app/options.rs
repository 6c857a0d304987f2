use clap::{Args, ValueEnum};
use serde_json::Value;

use crate::common::models::OptionSet;

/// 解析接口，三选一，不选时使用网页接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApiMode {
    Tv,
    App,
    Intl,
}

/// 只下载视频或只下载音频
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentMode {
    Video,
    Audio,
}

/// 编码限制
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecPreference {
    Hevc,
    Avc,
    Av1,
}

/// 新建任务表单
///
/// 每次提交前由 [`TaskOptions::collect`] 生成选项集合。开关只在勾选时出现，
/// 文本只在去掉首尾空白后非空时出现。
#[derive(Debug, Clone, Default, Args)]
pub struct TaskOptions {
    // 基本选项
    /// 仅解析而不进行下载
    #[arg(long)]
    pub only_show_info: bool,
    /// 展示所有分P标题
    #[arg(long)]
    pub show_all: bool,
    /// 交互式选择清晰度
    #[arg(long)]
    pub interactive: bool,
    /// 使用海外或港澳台区域解析
    #[arg(long, value_name = "AREA")]
    pub area: Option<String>,
    /// 音轨语言
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,
    /// 分P下载间隔（秒）
    #[arg(long, value_name = "SECONDS")]
    pub delay: Option<i64>,

    // 接口选项
    #[arg(long, value_enum, value_name = "API")]
    pub api: Option<ApiMode>,
    #[arg(long, value_name = "HOST")]
    pub tv_host: Option<String>,

    // 内容选择
    #[arg(long, value_enum, value_name = "CONTENT")]
    pub content: Option<ContentMode>,
    #[arg(long)]
    pub danmaku_only: bool,
    #[arg(long)]
    pub cover_only: bool,
    #[arg(long)]
    pub sub_only: bool,
    #[arg(long)]
    pub download_danmaku: bool,
    #[arg(long, value_name = "FORMATS")]
    pub danmaku_formats: Option<String>,
    /// 跳过AI字幕
    #[arg(long)]
    pub skip_ai: bool,

    // 下载控制
    #[arg(long)]
    pub multi_thread: bool,
    #[arg(long)]
    pub use_mp4box: bool,
    #[arg(long)]
    pub use_aria2c: bool,
    #[arg(long)]
    pub simply_mux: bool,
    #[arg(long)]
    pub skip_mux: bool,
    #[arg(long)]
    pub skip_subtitle: bool,
    #[arg(long)]
    pub skip_cover: bool,
    #[arg(long, value_name = "LIST")]
    pub encoding_priority: Option<String>,
    #[arg(long, value_name = "LIST")]
    pub dfn_priority: Option<String>,
    /// 选择分P，如 1,2 或 3-5 或 ALL
    #[arg(long, value_name = "PAGES")]
    pub select_page: Option<String>,

    // 文件命名
    #[arg(long, value_name = "PATTERN")]
    pub file_pattern: Option<String>,
    #[arg(long, value_name = "PATTERN")]
    pub multi_file_pattern: Option<String>,
    #[arg(long)]
    pub add_dfn_subfix: bool,
    #[arg(long)]
    pub no_padding_page: bool,

    // 路径设置
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub ffmpeg_path: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub mp4box_path: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub aria2c_path: Option<String>,

    // 网络设置
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,
    #[arg(long, value_name = "COOKIE")]
    pub cookie: Option<String>,
    #[arg(long, value_name = "TOKEN")]
    pub access_token: Option<String>,
    /// 指定解析接口的主机，发送时键名为 host
    #[arg(long = "api-host", value_name = "HOST")]
    pub api_host: Option<String>,
    #[arg(long, value_name = "HOST")]
    pub ep_host: Option<String>,
    #[arg(long, value_name = "HOST")]
    pub upos_host: Option<String>,
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub aria2c_args: Option<String>,
    #[arg(long, value_name = "PROXY")]
    pub aria2c_proxy: Option<String>,

    // 高级设置
    #[arg(long)]
    pub debug: bool,
    #[arg(long)]
    pub force_http: bool,
    #[arg(long)]
    pub allow_pcdn: bool,
    #[arg(long)]
    pub force_replace_host: bool,
    #[arg(long)]
    pub save_archives: bool,
    #[arg(long)]
    pub video_asc: bool,
    #[arg(long)]
    pub audio_asc: bool,
    #[arg(long)]
    pub bandwidth_asc: bool,

    // 兼容性选项
    #[arg(long, value_enum, value_name = "CODEC")]
    pub codec: Option<CodecPreference>,
}

impl TaskOptions {
    /// 收集表单选项
    pub fn collect(&self) -> OptionSet {
        let mut options = OptionSet::new();

        flag(&mut options, "onlyShowInfo", self.only_show_info);
        flag(&mut options, "showAll", self.show_all);
        flag(&mut options, "interactive", self.interactive);
        text(&mut options, "area", &self.area);
        text(&mut options, "language", &self.language);
        if let Some(delay) = self.delay.filter(|d| *d > 0) {
            options.insert("delay".to_string(), Value::from(delay));
        }

        match self.api {
            Some(ApiMode::Tv) => flag(&mut options, "useTvApi", true),
            Some(ApiMode::App) => flag(&mut options, "useAppApi", true),
            Some(ApiMode::Intl) => flag(&mut options, "useIntlApi", true),
            None => {}
        }
        text(&mut options, "tvHost", &self.tv_host);

        match self.content {
            Some(ContentMode::Video) => flag(&mut options, "videoOnly", true),
            Some(ContentMode::Audio) => flag(&mut options, "audioOnly", true),
            None => {}
        }
        flag(&mut options, "danmakuOnly", self.danmaku_only);
        flag(&mut options, "coverOnly", self.cover_only);
        flag(&mut options, "subOnly", self.sub_only);
        flag(&mut options, "downloadDanmaku", self.download_danmaku);
        text(&mut options, "danmakuFormats", &self.danmaku_formats);
        flag(&mut options, "skipAi", self.skip_ai);

        flag(&mut options, "multiThread", self.multi_thread);
        flag(&mut options, "useMp4box", self.use_mp4box);
        flag(&mut options, "useAria2c", self.use_aria2c);
        flag(&mut options, "simplyMux", self.simply_mux);
        flag(&mut options, "skipMux", self.skip_mux);
        flag(&mut options, "skipSubtitle", self.skip_subtitle);
        flag(&mut options, "skipCover", self.skip_cover);
        text(&mut options, "encodingPriority", &self.encoding_priority);
        text(&mut options, "dfnPriority", &self.dfn_priority);
        text(&mut options, "selectPage", &self.select_page);

        text(&mut options, "filePattern", &self.file_pattern);
        text(&mut options, "multiFilePattern", &self.multi_file_pattern);
        flag(&mut options, "addDfnSubfix", self.add_dfn_subfix);
        flag(&mut options, "noPaddingPage", self.no_padding_page);

        text(&mut options, "workDir", &self.work_dir);
        text(&mut options, "ffmpegPath", &self.ffmpeg_path);
        text(&mut options, "mp4boxPath", &self.mp4box_path);
        text(&mut options, "aria2cPath", &self.aria2c_path);

        text(&mut options, "userAgent", &self.user_agent);
        text(&mut options, "cookie", &self.cookie);
        text(&mut options, "accessToken", &self.access_token);
        text(&mut options, "host", &self.api_host);
        text(&mut options, "epHost", &self.ep_host);
        text(&mut options, "uposHost", &self.upos_host);
        text(&mut options, "aria2cArgs", &self.aria2c_args);
        text(&mut options, "aria2cProxy", &self.aria2c_proxy);

        flag(&mut options, "debug", self.debug);
        flag(&mut options, "forceHttp", self.force_http);
        flag(&mut options, "allowPcdn", self.allow_pcdn);
        flag(&mut options, "forceReplaceHost", self.force_replace_host);
        flag(&mut options, "saveArchives", self.save_archives);
        flag(&mut options, "videoAsc", self.video_asc);
        flag(&mut options, "audioAsc", self.audio_asc);
        flag(&mut options, "bandwidthAsc", self.bandwidth_asc);

        match self.codec {
            Some(CodecPreference::Hevc) => flag(&mut options, "onlyHevc", true),
            Some(CodecPreference::Avc) => flag(&mut options, "onlyAvc", true),
            Some(CodecPreference::Av1) => flag(&mut options, "onlyAv1", true),
            None => {}
        }

        options
    }
}

fn flag(options: &mut OptionSet, key: &str, enabled: bool) {
    if enabled {
        options.insert(key.to_string(), Value::Bool(true));
    }
}

fn text(options: &mut OptionSet, key: &str, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        options.insert(key.to_string(), Value::String(v.to_string()));
    }
}
