use std::fmt;

use url::Url;

use super::error::ApiError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 58682;

/// 任务服务器地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// 从用户输入构造地址，主机为空时使用 localhost，端口为空、非法或为 0 时使用 58682
    pub fn from_input(host: &str, port: &str) -> Self {
        let host = match host.trim() {
            "" => DEFAULT_HOST.to_string(),
            h => h.to_string(),
        };
        let port = port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_PORT);
        Self { host, port }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// 拼接接口路径
    pub fn join(&self, path: &str) -> Result<Url, ApiError> {
        let base = Url::parse(&self.base_url())?;
        Ok(base.join(path)?)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
