use crate::app::options::TaskOptions;
use crate::app::refresh::AutoRefresh;
use crate::common::api::Endpoint;
use crate::common::models::{Task, partition_tasks};
use crate::config::PanelConfig;
use crate::view::{
    GroupController, ModalController, Notification, NotificationCenter, OptionGroup, Tab,
    TabController,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// 当前连接，全局只有一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub endpoint: Endpoint,
    pub state: ConnectionState,
}

impl Connection {
    pub fn base_url(&self) -> String {
        self.endpoint.base_url()
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

/// 页面上的输入框
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub host: String,
    pub port: String,
    pub url: String,
    pub aid: String,
    pub options: TaskOptions,
}

/// 控制器持有的全部可变状态
pub struct AppState {
    pub connection: Connection,
    pub tasks: Vec<Task>,
    pub form: FormState,
    pub tabs: TabController,
    pub groups: GroupController,
    pub modal: ModalController,
    pub notifications: NotificationCenter,
    pub auto_refresh: AutoRefresh,
    pub loading: usize,
    // 每次连接或断开都会递增，旧连接上的结果会被丢弃
    pub(crate) epoch: u64,
    pub(crate) refresh_issued: u64,
    pub(crate) refresh_applied: u64,
}

impl AppState {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            connection: Connection {
                endpoint: config.endpoint.clone(),
                state: ConnectionState::Disconnected,
            },
            tasks: Vec::new(),
            form: FormState {
                host: config.endpoint.host.clone(),
                port: config.endpoint.port.to_string(),
                ..FormState::default()
            },
            tabs: TabController::new(),
            groups: GroupController::new(),
            modal: ModalController::default(),
            notifications: NotificationCenter::new(config.notification_ttl),
            auto_refresh: AutoRefresh::new(config.auto_refresh),
            loading: 0,
            epoch: 0,
            refresh_issued: 0,
            refresh_applied: 0,
        }
    }

    /// 连接断开：清除标志并取消自动刷新
    pub(crate) fn drop_connection(&mut self) {
        self.epoch += 1;
        self.connection.state = ConnectionState::Disconnected;
        self.auto_refresh.stop();
    }

    /// 生成渲染所需的快照
    pub fn view(&self) -> DashboardView {
        let (running, finished) = partition_tasks(&self.tasks);
        DashboardView {
            connection: self.connection.clone(),
            running: running.into_iter().cloned().collect(),
            finished: finished.into_iter().cloned().collect(),
            active_tab: self.tabs.active(),
            expanded_groups: OptionGroup::ALL
                .into_iter()
                .filter(|g| self.groups.is_expanded(*g))
                .collect(),
            modal: self.modal.task().cloned(),
            notifications: self.notifications.active().to_vec(),
            loading: self.loading > 0,
            auto_refresh: self.auto_refresh.is_enabled(),
        }
    }
}

/// 渲染描述：状态变化后由控制器生成，渲染步骤只读取它
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub connection: Connection,
    pub running: Vec<Task>,
    pub finished: Vec<Task>,
    pub active_tab: Tab,
    pub expanded_groups: Vec<OptionGroup>,
    pub modal: Option<Task>,
    pub notifications: Vec<Notification>,
    pub loading: bool,
    pub auto_refresh: bool,
}

impl DashboardView {
    pub fn is_expanded(&self, group: OptionGroup) -> bool {
        self.expanded_groups.contains(&group)
    }
}
