use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct RefreshTimer {
    token: CancellationToken,
    _handle: JoinHandle<()>,
}

/// 自动刷新定时器
///
/// 同一时间最多只有一个定时器，启动新定时器前会先取消旧的。
pub struct AutoRefresh {
    enabled: bool,
    timer: Option<RefreshTimer>,
    started: u64,
}

impl AutoRefresh {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timer: None,
            started: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|t| !t.token.is_cancelled())
    }

    /// 累计启动次数
    pub fn started(&self) -> u64 {
        self.started
    }

    /// 每隔 `interval` 调用一次 `tick`，第一次在一个间隔之后
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn start<F, Fut>(&mut self, interval: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => tick().await,
                }
            }
            debug!("自动刷新已停止");
        });

        self.started += 1;
        self.timer = Some(RefreshTimer {
            token,
            _handle: handle,
        });
        debug!("自动刷新已启动，间隔 {:?}", interval);
    }

    /// 取消定时器，返回之前是否在运行
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.token.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
