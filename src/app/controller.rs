use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::confirm::Confirm;
use super::error::PanelError;
use super::state::{AppState, Connection, ConnectionState, DashboardView, FormState};
use crate::common::api::{Endpoint, TaskApi};
use crate::common::models::{Task, failed_tasks, finished_tasks};
use crate::config::PanelConfig;
use crate::view::{ModalClick, NotificationLevel, OptionGroup, Tab};

/// 批量移除的范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Batch {
    Finished,
    Failed,
}

struct Inner {
    api: Arc<dyn TaskApi>,
    confirm: Arc<dyn Confirm>,
    config: PanelConfig,
    state: Mutex<AppState>,
    revision: watch::Sender<u64>,
}

/// 应用控制器
///
/// 所有状态都放在一个 [`AppState`] 里，锁不会跨越 `.await`。每次修改状态后递增
/// 修订号，渲染方通过 [`PanelController::subscribe`] 得知需要重新渲染，
/// 再调用 [`PanelController::view`] 取快照。
///
/// 连接和刷新都带有代号：结果返回时如果已经有更新的连接、断开或刷新，结果直接丢弃。
#[derive(Clone)]
pub struct PanelController {
    inner: Arc<Inner>,
}

impl PanelController {
    pub fn new(api: Arc<dyn TaskApi>, confirm: Arc<dyn Confirm>, config: PanelConfig) -> Self {
        let state = AppState::new(&config);
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                api,
                confirm,
                config,
                state: Mutex::new(state),
                revision,
            }),
        }
    }

    // -------------------------------------------------------------------------------------------
    // 状态访问

    fn with_state<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let result = {
            let mut state = self
                .inner
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut state)
        };
        self.inner.revision.send_modify(|r| *r += 1);
        result
    }

    fn read_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn view(&self) -> DashboardView {
        self.read_state(AppState::view)
    }

    pub fn connection(&self) -> Connection {
        self.read_state(|s| s.connection.clone())
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.read_state(|s| s.connection.state)
    }

    pub fn is_connected(&self) -> bool {
        self.read_state(|s| s.connection.is_connected())
    }

    /// 最近一次刷新得到的任务列表
    pub fn tasks(&self) -> Vec<Task> {
        self.read_state(|s| s.tasks.clone())
    }

    pub fn form(&self) -> FormState {
        self.read_state(|s| s.form.clone())
    }

    pub fn update_form(&self, f: impl FnOnce(&mut FormState)) {
        self.with_state(|s| f(&mut s.form));
    }

    pub fn auto_refresh_running(&self) -> bool {
        self.read_state(|s| s.auto_refresh.is_running())
    }

    /// 自动刷新定时器累计启动次数
    pub fn auto_refresh_starts(&self) -> u64 {
        self.read_state(|s| s.auto_refresh.started())
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NotificationLevel::Error => error!("{}", message),
            NotificationLevel::Warning => warn!("{}", message),
            _ => info!("{}", message),
        }
        self.with_state(|s| s.notifications.push(level, message));
    }

    // 校验失败：提示后直接返回，不发请求
    fn reject<T>(&self, err: PanelError) -> Result<T, PanelError> {
        self.notify(NotificationLevel::Warning, err.to_string());
        Err(err)
    }

    fn ensure_connected(&self) -> Result<(), PanelError> {
        if self.is_connected() {
            Ok(())
        } else {
            self.reject(PanelError::NotConnected)
        }
    }

    // 请求期间显示加载指示
    async fn busy<T>(&self, fut: impl Future<Output = T>) -> T {
        self.with_state(|s| s.loading += 1);
        let out = fut.await;
        self.with_state(|s| s.loading = s.loading.saturating_sub(1));
        out
    }

    // -------------------------------------------------------------------------------------------
    // 连接

    /// 连接服务器，主机和端口为空或非法时使用默认值
    ///
    /// 连接测试通过后立即刷新一次，刷新失败同样返回错误。
    pub async fn connect(&self, host: &str, port: &str) -> Result<(), PanelError> {
        let endpoint = Endpoint::from_input(host, port);
        let epoch = self.with_state(|s| {
            s.auto_refresh.stop();
            s.epoch += 1;
            s.connection = Connection {
                endpoint: endpoint.clone(),
                state: ConnectionState::Connecting,
            };
            s.form.host = endpoint.host.clone();
            s.form.port = endpoint.port.to_string();
            s.epoch
        });

        info!("正在连接 {}", endpoint.base_url());
        self.inner.api.update_connection(&endpoint);
        let connected = self.inner.api.test_connection().await;

        let current = self.with_state(|s| {
            if s.epoch != epoch {
                return false;
            }
            s.connection.state = if connected {
                ConnectionState::Connected
            } else {
                ConnectionState::Disconnected
            };
            true
        });
        if !current {
            debug!("连接 {} 的结果已过期，忽略", endpoint);
            return Err(PanelError::Superseded);
        }

        if !connected {
            self.notify(
                NotificationLevel::Error,
                "连接失败，请检查服务器地址和端口",
            );
            return Err(PanelError::ConnectFailed(endpoint.base_url()));
        }

        self.notify(NotificationLevel::Success, "连接成功！");
        self.with_state(|s| {
            if s.auto_refresh.is_enabled() {
                self.start_timer(s);
            }
        });
        // 刷新失败时已经提示并断开，这里把错误交给调用方
        self.refresh().await
    }

    /// 主动断开
    pub fn disconnect(&self) {
        let was_connected = self.with_state(|s| {
            let was = s.connection.state != ConnectionState::Disconnected;
            s.drop_connection();
            was
        });
        if was_connected {
            self.notify(NotificationLevel::Info, "已断开连接");
        }
    }

    // -------------------------------------------------------------------------------------------
    // 刷新

    /// 拉取任务列表并整体替换，未连接时什么也不做
    ///
    /// 任何失败都视为连接已断开。
    pub async fn refresh(&self) -> Result<(), PanelError> {
        let ticket = self.with_state(|s| {
            if !s.connection.is_connected() {
                return None;
            }
            s.refresh_issued += 1;
            Some((s.epoch, s.refresh_issued))
        });
        let Some((epoch, seq)) = ticket else {
            return Ok(());
        };

        let result = self.inner.api.get_tasks().await;

        let outcome = self.with_state(|s| {
            if s.epoch != epoch || seq <= s.refresh_applied {
                return None;
            }
            s.refresh_applied = seq;
            Some(match result {
                Ok(tasks) => {
                    debug!("刷新得到 {} 个任务", tasks.len());
                    s.tasks = tasks;
                    Ok(())
                }
                Err(e) => {
                    s.drop_connection();
                    Err(e)
                }
            })
        });

        match outcome {
            None => {
                debug!("刷新结果 #{} 已过期，忽略", seq);
                Ok(())
            }
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => {
                error!("刷新任务失败: {}", e);
                self.notify(NotificationLevel::Error, "刷新任务失败，连接已断开");
                Err(e.into())
            }
        }
    }

    /// 自动刷新开关
    pub fn set_auto_refresh(&self, enabled: bool) {
        self.with_state(|s| {
            s.auto_refresh.set_enabled(enabled);
            if enabled && s.connection.is_connected() {
                self.start_timer(s);
            } else {
                s.auto_refresh.stop();
            }
        });
    }

    fn start_timer(&self, state: &mut AppState) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        state
            .auto_refresh
            .start(self.inner.config.refresh_interval, move || {
                let weak = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        let _ = PanelController { inner }.refresh().await;
                    }
                }
            });
    }

    // -------------------------------------------------------------------------------------------
    // 任务操作

    /// 添加任务，选项来自当前表单
    pub async fn add_task(&self, url: &str) -> Result<Value, PanelError> {
        let url = url.trim();
        if url.is_empty() {
            return self.reject(PanelError::Validation("请输入视频URL".to_string()));
        }
        self.ensure_connected()?;

        let options = self.read_state(|s| s.form.options.collect());
        debug!("添加任务 {}，选项: {:?}", url, options);

        match self.busy(self.inner.api.add_task(url, &options)).await {
            Ok(ack) => {
                self.notify(NotificationLevel::Success, "任务添加成功！");
                self.with_state(|s| s.form.url.clear());
                let _ = self.refresh().await;
                self.activate_tab(Tab::Dashboard);
                Ok(ack)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, format!("添加任务失败: {}", e));
                Err(e.into())
            }
        }
    }

    /// 移除单个任务，返回实际移除数量（用户取消时为 0）
    pub async fn remove_task(&self, aid: &str) -> Result<usize, PanelError> {
        self.ensure_connected()?;

        if !self
            .inner
            .confirm
            .confirm(&format!("确定要移除任务 {} 吗？", aid))
        {
            debug!("用户取消移除任务 {}", aid);
            return Ok(0);
        }

        match self.busy(self.inner.api.remove_task(aid)).await {
            Ok(_) => {
                self.notify(NotificationLevel::Success, "任务移除成功！");
                let _ = self.refresh().await;
                Ok(1)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, format!("移除任务失败: {}", e));
                Err(e.into())
            }
        }
    }

    /// 按输入的 AID 移除，完成后清空输入框
    pub async fn remove_by_aid(&self, aid: &str) -> Result<usize, PanelError> {
        let aid = aid.trim();
        if aid.is_empty() {
            return self.reject(PanelError::Validation("请输入要移除的任务AID".to_string()));
        }

        let result = self.remove_task(aid).await;
        self.with_state(|s| s.form.aid.clear());
        result
    }

    pub async fn remove_all_finished(&self) -> Result<usize, PanelError> {
        self.remove_batch(Batch::Finished).await
    }

    pub async fn remove_all_failed(&self) -> Result<usize, PanelError> {
        self.remove_batch(Batch::Failed).await
    }

    // 依次删除，遇到第一个失败就停止
    async fn remove_batch(&self, batch: Batch) -> Result<usize, PanelError> {
        self.ensure_connected()?;

        let targets: Vec<String> = self.read_state(|s| {
            let selected = match batch {
                Batch::Finished => finished_tasks(&s.tasks),
                Batch::Failed => failed_tasks(&s.tasks),
            };
            selected.into_iter().map(|t| t.aid.clone()).collect()
        });

        let (kind, empty_message) = match batch {
            Batch::Finished => ("已完成", "没有已完成的任务"),
            Batch::Failed => ("失败", "没有失败的任务"),
        };
        if targets.is_empty() {
            self.notify(NotificationLevel::Info, empty_message);
            return Ok(0);
        }

        let count = targets.len();
        if !self
            .inner
            .confirm
            .confirm(&format!("确定要移除所有 {} 个{}任务吗？", count, kind))
        {
            return Ok(0);
        }

        let result = self
            .busy(async {
                for aid in &targets {
                    debug!("移除任务 {}", aid);
                    self.inner.api.remove_task(aid).await?;
                }
                Ok::<_, crate::common::api::ApiError>(())
            })
            .await;

        match result {
            Ok(()) => {
                let message = match batch {
                    Batch::Finished => format!("成功移除 {} 个任务！", count),
                    Batch::Failed => format!("成功移除 {} 个失败任务！", count),
                };
                self.notify(NotificationLevel::Success, message);
                let _ = self.refresh().await;
                Ok(count)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, format!("批量移除失败: {}", e));
                Err(e.into())
            }
        }
    }

    /// 获取详情并打开模态框
    pub async fn show_task_detail(&self, aid: &str) -> Result<Task, PanelError> {
        self.ensure_connected()?;

        match self.busy(self.inner.api.get_task_detail(aid)).await {
            Ok(task) => {
                self.with_state(|s| s.modal.open(task.clone()));
                Ok(task)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, format!("获取任务详情失败: {}", e));
                Err(e.into())
            }
        }
    }

    // -------------------------------------------------------------------------------------------
    // 界面状态

    pub fn activate_tab(&self, tab: Tab) {
        self.with_state(|s| s.tabs.activate(tab));
    }

    pub fn toggle_group(&self, group: OptionGroup) -> bool {
        self.with_state(|s| s.groups.toggle(group))
    }

    pub fn click_modal(&self, target: ModalClick) {
        self.with_state(|s| s.modal.click(target));
    }

    pub fn close_modal(&self) {
        self.with_state(|s| s.modal.close());
    }

    pub fn dismiss_notification(&self, id: u64) -> bool {
        self.with_state(|s| s.notifications.dismiss(id))
    }

    /// 清理过期通知，没有清理时不触发重新渲染
    pub fn expire_notifications(&self) -> usize {
        let removed = {
            let mut state = self
                .inner
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            state.notifications.expire(Instant::now())
        };
        if removed > 0 {
            self.inner.revision.send_modify(|r| *r += 1);
        }
        removed
    }
}
