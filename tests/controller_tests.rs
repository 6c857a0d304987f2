use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bbdown_panel::app::{AutoConfirm, ConnectionState, PanelController, PanelError};
use bbdown_panel::common::api::{ApiError, Endpoint, TaskApi};
use bbdown_panel::common::models::{OptionSet, Task, TaskStatus};
use bbdown_panel::config::PanelConfig;
use bbdown_panel::view::{ModalClick, NotificationLevel, Tab};
use serde_json::{Value, json};

fn task(aid: &str, status: TaskStatus) -> Task {
    Task {
        aid: aid.to_string(),
        title: Some(format!("任务 {}", aid)),
        status,
        ..Task::default()
    }
}

fn sample_tasks() -> Vec<Task> {
    vec![
        task("1", TaskStatus::Running),
        task("2", TaskStatus::Completed),
        task("3", TaskStatus::Failed),
        task("4", TaskStatus::Cancelled),
        task("5", TaskStatus::Pending),
    ]
}

/// 按脚本返回结果的任务服务器
#[derive(Default)]
struct MockApi {
    calls: Mutex<Vec<String>>,
    offline: AtomicBool,
    fail_tasks: AtomicBool,
    fail_add: AtomicBool,
    // 依次消费的连接测试：延迟加结果
    connect_script: Mutex<VecDeque<(Duration, bool)>>,
    tasks: Mutex<Vec<Task>>,
    // 依次消费的 get_tasks 响应：延迟加结果
    scripted: Mutex<VecDeque<(Duration, Vec<Task>)>>,
    failing_removals: Mutex<HashSet<String>>,
    last_options: Mutex<Option<OptionSet>>,
    endpoint: Mutex<Option<Endpoint>>,
}

impl MockApi {
    fn with_tasks(tasks: Vec<Task>) -> Arc<Self> {
        let api = Self::default();
        *api.tasks.lock().unwrap() = tasks;
        Arc::new(api)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn removals(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("remove:").map(str::to_string))
            .collect()
    }
}

fn boom() -> ApiError {
    ApiError::Status {
        code: 500,
        reason: "Internal Server Error".to_string(),
    }
}

#[async_trait]
impl TaskApi for MockApi {
    fn update_connection(&self, endpoint: &Endpoint) {
        *self.endpoint.lock().unwrap() = Some(endpoint.clone());
    }

    async fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.record("get_tasks");
        let scripted = self.scripted.lock().unwrap().pop_front();
        if let Some((delay, tasks)) = scripted {
            tokio::time::sleep(delay).await;
            return Ok(tasks);
        }
        if self.fail_tasks.load(Ordering::SeqCst) {
            return Err(boom());
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn add_task(&self, url: &str, options: &OptionSet) -> Result<Value, ApiError> {
        self.record(format!("add:{}", url));
        *self.last_options.lock().unwrap() = Some(options.clone());
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(boom());
        }
        Ok(json!({ "AID": "new" }))
    }

    async fn remove_task(&self, aid: &str) -> Result<Value, ApiError> {
        self.record(format!("remove:{}", aid));
        if self.failing_removals.lock().unwrap().contains(aid) {
            return Err(boom());
        }
        self.tasks.lock().unwrap().retain(|t| t.aid != aid);
        Ok(Value::Null)
    }

    async fn get_task_detail(&self, aid: &str) -> Result<Task, ApiError> {
        self.record(format!("detail:{}", aid));
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.aid == aid)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                code: 404,
                reason: "Not Found".to_string(),
            })
    }

    async fn test_connection(&self) -> bool {
        self.record("test");
        let scripted = self.connect_script.lock().unwrap().pop_front();
        if let Some((delay, online)) = scripted {
            tokio::time::sleep(delay).await;
            return online;
        }
        !self.offline.load(Ordering::SeqCst)
    }
}

fn manual_config() -> PanelConfig {
    PanelConfig {
        auto_refresh: false,
        ..PanelConfig::default()
    }
}

fn controller(api: &Arc<MockApi>, confirm: bool, config: PanelConfig) -> PanelController {
    PanelController::new(api.clone(), Arc::new(AutoConfirm(confirm)), config)
}

fn messages(controller: &PanelController, level: NotificationLevel) -> Vec<String> {
    controller
        .view()
        .notifications
        .into_iter()
        .filter(|n| n.level == level)
        .map(|n| n.message)
        .collect()
}

#[tokio::test]
async fn test_connect_success_refreshes_once() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());

    panel.connect("", "").await.unwrap();

    assert_eq!(panel.connection_state(), ConnectionState::Connected);
    assert_eq!(panel.connection().base_url(), "http://localhost:58682");
    assert_eq!(
        api.endpoint.lock().unwrap().clone(),
        Some(Endpoint::default())
    );
    assert_eq!(api.calls(), vec!["test", "get_tasks"]);
    assert_eq!(panel.tasks().len(), 5);
    assert_eq!(
        messages(&panel, NotificationLevel::Success),
        vec!["连接成功！"]
    );

    let view = panel.view();
    assert_eq!(view.running.len(), 2);
    assert_eq!(view.finished.len(), 3);
}

#[tokio::test]
async fn test_connect_failure_stays_disconnected() {
    let api = MockApi::with_tasks(sample_tasks());
    api.offline.store(true, Ordering::SeqCst);
    let panel = controller(&api, true, PanelConfig::default());

    let err = panel.connect("10.0.0.1", "8080").await.unwrap_err();

    assert!(matches!(err, PanelError::ConnectFailed(_)));
    assert_eq!(panel.connection_state(), ConnectionState::Disconnected);
    assert_eq!(api.count("get_tasks"), 0);
    assert!(!panel.auto_refresh_running());
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["连接失败，请检查服务器地址和端口"]
    );
    assert_eq!(panel.form().host, "10.0.0.1");
    assert_eq!(panel.form().port, "8080");
}

#[tokio::test(start_paused = true)]
async fn test_connect_reports_failed_first_refresh() {
    let api = MockApi::with_tasks(sample_tasks());
    api.fail_tasks.store(true, Ordering::SeqCst);
    let panel = controller(&api, true, PanelConfig::default());

    let err = panel.connect("", "").await.unwrap_err();

    assert!(matches!(err, PanelError::Api(ApiError::Status { code: 500, .. })));
    assert_eq!(panel.connection_state(), ConnectionState::Disconnected);
    assert!(!panel.auto_refresh_running());
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["刷新任务失败，连接已断开"]
    );
    assert!(panel.tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_connect_is_discarded() {
    let api = MockApi::with_tasks(sample_tasks());
    api.connect_script.lock().unwrap().extend([
        (Duration::from_secs(5), true),
        (Duration::from_secs(1), false),
    ]);
    let panel = controller(&api, true, PanelConfig::default());

    let (slow, fast) = tokio::join!(panel.connect("h", "1"), panel.connect("h", "2"));

    assert!(matches!(slow.unwrap_err(), PanelError::Superseded));
    assert!(matches!(fast.unwrap_err(), PanelError::ConnectFailed(_)));
    assert_eq!(panel.connection_state(), ConnectionState::Disconnected);
    assert_eq!(panel.connection().base_url(), "http://h:2");
    assert_eq!(api.count("get_tasks"), 0);
    assert!(!panel.auto_refresh_running());
    assert!(messages(&panel, NotificationLevel::Success).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_later_connect_wins_over_slow_failure() {
    let api = MockApi::with_tasks(sample_tasks());
    api.connect_script.lock().unwrap().extend([
        (Duration::from_secs(5), false),
        (Duration::from_secs(1), true),
    ]);
    let panel = controller(&api, true, manual_config());

    let (slow, fast) = tokio::join!(panel.connect("h", "1"), panel.connect("h", "2"));

    assert!(matches!(slow.unwrap_err(), PanelError::Superseded));
    fast.unwrap();
    assert_eq!(panel.connection_state(), ConnectionState::Connected);
    assert_eq!(panel.connection().base_url(), "http://h:2");
    assert_eq!(api.count("get_tasks"), 1);
    assert!(messages(&panel, NotificationLevel::Error).is_empty());
}

#[tokio::test]
async fn test_invalid_port_falls_back_to_default() {
    let api = MockApi::with_tasks(Vec::new());
    let panel = controller(&api, true, manual_config());

    panel.connect("nas.local", "abc").await.unwrap();
    assert_eq!(panel.connection().base_url(), "http://nas.local:58682");
}

#[tokio::test(start_paused = true)]
async fn test_refresh_failure_disconnects_and_stops_timer() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, PanelConfig::default());

    panel.connect("", "").await.unwrap();
    assert!(panel.auto_refresh_running());

    api.fail_tasks.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(11)).await;

    assert_eq!(panel.connection_state(), ConnectionState::Disconnected);
    assert!(!panel.auto_refresh_running());
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["刷新任务失败，连接已断开"]
    );
    // 上一次成功的列表保留
    assert_eq!(panel.tasks().len(), 5);

    let before = api.count("get_tasks");
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(api.count("get_tasks"), before);

    // 断开后手动刷新什么也不做
    panel.refresh().await.unwrap();
    assert_eq!(api.count("get_tasks"), before);
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_interval() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, PanelConfig::default());

    panel.connect("", "").await.unwrap();
    tokio::time::sleep(Duration::from_secs(25)).await;
    // 连接后一次，10 秒和 20 秒各一次
    assert_eq!(api.count("get_tasks"), 3);
    assert_eq!(panel.auto_refresh_starts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_auto_refresh_toggle_keeps_single_timer() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, PanelConfig::default());
    panel.connect("", "").await.unwrap();

    panel.set_auto_refresh(false);
    assert!(!panel.auto_refresh_running());
    assert!(!panel.view().auto_refresh);
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(api.count("get_tasks"), 1);

    panel.set_auto_refresh(true);
    panel.set_auto_refresh(true);
    assert!(panel.auto_refresh_running());
    assert_eq!(panel.auto_refresh_starts(), 3);

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(api.count("get_tasks"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_replaces_timer() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, PanelConfig::default());

    panel.connect("", "").await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    panel.connect("", "").await.unwrap();
    assert_eq!(api.count("get_tasks"), 2);

    // 第二个定时器从 5 秒开始计时，旧定时器不再触发
    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(api.count("get_tasks"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stale_refresh_is_discarded() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    api.scripted.lock().unwrap().extend([
        (Duration::from_secs(5), vec![task("old", TaskStatus::Running)]),
        (Duration::from_secs(1), vec![task("new", TaskStatus::Running)]),
    ]);

    let (slow, fast) = tokio::join!(panel.refresh(), panel.refresh());
    slow.unwrap();
    fast.unwrap();

    let tasks = panel.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].aid, "new");
}

#[tokio::test]
async fn test_add_task_rejects_blank_url() {
    let api = MockApi::with_tasks(Vec::new());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    let err = panel.add_task("   ").await.unwrap_err();
    assert!(matches!(err, PanelError::Validation(_)));
    assert!(api.calls().iter().all(|c| !c.starts_with("add:")));
    assert_eq!(
        messages(&panel, NotificationLevel::Warning),
        vec!["请输入视频URL"]
    );
}

#[tokio::test]
async fn test_add_task_requires_connection() {
    let api = MockApi::with_tasks(Vec::new());
    let panel = controller(&api, true, manual_config());

    let err = panel
        .add_task("https://www.bilibili.com/video/BV1xx411c7mD")
        .await
        .unwrap_err();
    assert!(matches!(err, PanelError::NotConnected));
    assert!(api.calls().is_empty());
    assert_eq!(
        messages(&panel, NotificationLevel::Warning),
        vec!["请先连接到服务器"]
    );
}

#[tokio::test]
async fn test_add_task_sends_form_options() {
    let api = MockApi::with_tasks(Vec::new());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();
    panel.activate_tab(Tab::AddTask);

    let url = "https://www.bilibili.com/video/BV1xx411c7mD";
    panel.update_form(|form| {
        form.url = url.to_string();
        form.options.show_all = true;
        form.options.delay = Some(3);
    });

    let ack = panel.add_task(url).await.unwrap();
    assert_eq!(ack, json!({ "AID": "new" }));

    let options = api.last_options.lock().unwrap().clone().unwrap();
    assert_eq!(Value::Object(options), json!({ "showAll": true, "delay": 3 }));

    assert_eq!(api.count("get_tasks"), 2);
    assert!(panel.form().url.is_empty());
    assert_eq!(panel.view().active_tab, Tab::Dashboard);
    assert!(!panel.view().loading);
    assert!(messages(&panel, NotificationLevel::Success).contains(&"任务添加成功！".to_string()));
}

#[tokio::test]
async fn test_add_task_failure_keeps_state() {
    let api = MockApi::with_tasks(sample_tasks());
    api.fail_add.store(true, Ordering::SeqCst);
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();
    panel.activate_tab(Tab::AddTask);

    let url = "https://www.bilibili.com/video/BV1xx411c7mD";
    panel.update_form(|form| form.url = url.to_string());

    let err = panel.add_task(url).await.unwrap_err();
    assert!(matches!(err, PanelError::Api(_)));
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["添加任务失败: HTTP 500: Internal Server Error"]
    );
    assert_eq!(panel.form().url, url);
    assert_eq!(panel.view().active_tab, Tab::AddTask);
    assert_eq!(api.count("get_tasks"), 1);
    assert!(panel.is_connected());
    assert!(!panel.view().loading);
}

#[tokio::test]
async fn test_remove_task_failure_is_reported() {
    let api = MockApi::with_tasks(sample_tasks());
    api.failing_removals.lock().unwrap().insert("2".to_string());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    let err = panel.remove_task("2").await.unwrap_err();
    assert!(matches!(err, PanelError::Api(ApiError::Status { code: 500, .. })));
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["移除任务失败: HTTP 500: Internal Server Error"]
    );
    assert_eq!(api.count("get_tasks"), 1);
    assert_eq!(panel.tasks().len(), 5);
    assert!(panel.is_connected());
}

#[tokio::test]
async fn test_task_operations_require_connection() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());

    assert!(matches!(
        panel.show_task_detail("1").await.unwrap_err(),
        PanelError::NotConnected
    ));
    assert!(matches!(
        panel.remove_task("1").await.unwrap_err(),
        PanelError::NotConnected
    ));
    assert!(matches!(
        panel.remove_by_aid("1").await.unwrap_err(),
        PanelError::NotConnected
    ));
    assert!(matches!(
        panel.remove_all_finished().await.unwrap_err(),
        PanelError::NotConnected
    ));
    assert!(matches!(
        panel.remove_all_failed().await.unwrap_err(),
        PanelError::NotConnected
    ));

    assert!(api.calls().is_empty());
    assert!(panel.view().modal.is_none());
    assert_eq!(
        messages(&panel, NotificationLevel::Warning),
        vec!["请先连接到服务器"; 5]
    );
}

#[tokio::test]
async fn test_remove_all_finished_in_order() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    let removed = panel.remove_all_finished().await.unwrap();
    assert_eq!(removed, 3);
    assert_eq!(api.removals(), vec!["2", "3", "4"]);
    assert!(messages(&panel, NotificationLevel::Success).contains(&"成功移除 3 个任务！".to_string()));

    // 移除后重新拉取，只剩未完成的任务
    assert_eq!(panel.view().finished.len(), 0);
    assert_eq!(panel.view().running.len(), 2);
}

#[tokio::test]
async fn test_batch_removal_stops_at_first_failure() {
    let api = MockApi::with_tasks(sample_tasks());
    api.failing_removals.lock().unwrap().insert("3".to_string());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    let err = panel.remove_all_finished().await.unwrap_err();
    assert!(matches!(err, PanelError::Api(ApiError::Status { code: 500, .. })));
    assert_eq!(api.removals(), vec!["2", "3"]);
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["批量移除失败: HTTP 500: Internal Server Error"]
    );
    // 失败后不刷新
    assert_eq!(api.count("get_tasks"), 1);
}

#[tokio::test]
async fn test_remove_all_failed_targets_failed_and_cancelled() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    assert_eq!(panel.remove_all_failed().await.unwrap(), 2);
    assert_eq!(api.removals(), vec!["3", "4"]);
    assert!(
        messages(&panel, NotificationLevel::Success)
            .contains(&"成功移除 2 个失败任务！".to_string())
    );
}

#[tokio::test]
async fn test_empty_batch_only_informs() {
    let api = MockApi::with_tasks(vec![task("1", TaskStatus::Running)]);
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    assert_eq!(panel.remove_all_finished().await.unwrap(), 0);
    assert_eq!(panel.remove_all_failed().await.unwrap(), 0);
    assert!(api.removals().is_empty());
    assert_eq!(
        messages(&panel, NotificationLevel::Info),
        vec!["没有已完成的任务", "没有失败的任务"]
    );
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, false, manual_config());
    panel.connect("", "").await.unwrap();

    assert_eq!(panel.remove_all_finished().await.unwrap(), 0);
    assert_eq!(panel.remove_task("2").await.unwrap(), 0);
    assert!(api.removals().is_empty());
    assert_eq!(panel.tasks().len(), 5);
}

#[tokio::test]
async fn test_remove_by_aid() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    let err = panel.remove_by_aid("  ").await.unwrap_err();
    assert!(matches!(err, PanelError::Validation(_)));
    assert_eq!(
        messages(&panel, NotificationLevel::Warning),
        vec!["请输入要移除的任务AID"]
    );

    panel.update_form(|form| form.aid = "5".to_string());
    assert_eq!(panel.remove_by_aid(" 5 ").await.unwrap(), 1);
    assert_eq!(api.removals(), vec!["5"]);
    assert!(panel.form().aid.is_empty());
    assert_eq!(panel.tasks().len(), 4);
}

#[tokio::test]
async fn test_task_detail_opens_modal() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, manual_config());
    panel.connect("", "").await.unwrap();

    let detail = panel.show_task_detail("3").await.unwrap();
    assert_eq!(detail.status, TaskStatus::Failed);
    assert_eq!(panel.view().modal.map(|t| t.aid), Some("3".to_string()));

    panel.click_modal(ModalClick::Content);
    assert!(panel.view().modal.is_some());
    panel.click_modal(ModalClick::Backdrop);
    assert!(panel.view().modal.is_none());

    let err = panel.show_task_detail("404").await.unwrap_err();
    assert!(matches!(err, PanelError::Api(_)));
    assert!(panel.view().modal.is_none());
    assert_eq!(
        messages(&panel, NotificationLevel::Error),
        vec!["获取任务详情失败: HTTP 404: Not Found"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_notifications_expire_and_signal_changes() {
    let api = MockApi::with_tasks(Vec::new());
    let panel = controller(&api, true, manual_config());
    let mut changes = panel.subscribe();

    panel.connect("", "").await.unwrap();
    assert!(changes.has_changed().unwrap());
    changes.borrow_and_update();

    assert_eq!(panel.expire_notifications(), 0);
    assert!(!changes.has_changed().unwrap());

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(panel.expire_notifications(), 1);
    assert!(changes.has_changed().unwrap());
    assert!(panel.view().notifications.is_empty());
}

#[tokio::test]
async fn test_disconnect() {
    let api = MockApi::with_tasks(sample_tasks());
    let panel = controller(&api, true, PanelConfig::default());
    panel.connect("", "").await.unwrap();

    panel.disconnect();
    assert!(!panel.is_connected());
    assert!(!panel.auto_refresh_running());
    assert_eq!(messages(&panel, NotificationLevel::Info), vec!["已断开连接"]);
}
