use std::time::Duration;

use crate::common::api::Endpoint;
use crate::view::notifications::NOTIFICATION_TTL;

/// 自动刷新间隔
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// 控制面板配置，只存在于内存中
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub endpoint: Endpoint,
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
    pub notification_ttl: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            auto_refresh: true,
            refresh_interval: REFRESH_INTERVAL,
            notification_ttl: NOTIFICATION_TTL,
            request_timeout: None,
        }
    }
}
