/// 页面选项卡
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    AddTask,
    Manage,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::AddTask, Tab::Manage];

    /// 选项卡对应的面板 id
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::AddTask => "add-task",
            Tab::Manage => "manage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "仪表盘",
            Tab::AddTask => "添加任务",
            Tab::Manage => "任务管理",
        }
    }

    pub fn from_id(id: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.id() == id)
    }
}

/// 选项卡控制器，任何时候只有一个选项卡处于激活状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn new() -> Self {
        Self {
            active: Tab::Dashboard,
        }
    }

    /// 点击选项卡：其余选项卡及其面板全部取消激活
    pub fn activate(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }
}

impl Default for TabController {
    fn default() -> Self {
        Self::new()
    }
}
