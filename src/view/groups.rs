use std::collections::HashSet;

/// 新建任务表单里的折叠分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionGroup {
    Basic,
    Api,
    Content,
    Control,
    File,
    Path,
    Network,
    Advanced,
    Compat,
}

impl OptionGroup {
    pub const ALL: [OptionGroup; 9] = [
        OptionGroup::Basic,
        OptionGroup::Api,
        OptionGroup::Content,
        OptionGroup::Control,
        OptionGroup::File,
        OptionGroup::Path,
        OptionGroup::Network,
        OptionGroup::Advanced,
        OptionGroup::Compat,
    ];

    /// 对应页面上的 data-group 属性
    pub fn id(&self) -> &'static str {
        match self {
            OptionGroup::Basic => "basic",
            OptionGroup::Api => "api",
            OptionGroup::Content => "content",
            OptionGroup::Control => "control",
            OptionGroup::File => "file",
            OptionGroup::Path => "path",
            OptionGroup::Network => "network",
            OptionGroup::Advanced => "advanced",
            OptionGroup::Compat => "compat",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            OptionGroup::Basic => "基本选项",
            OptionGroup::Api => "API选项",
            OptionGroup::Content => "内容选择",
            OptionGroup::Control => "下载控制",
            OptionGroup::File => "文件命名",
            OptionGroup::Path => "路径设置",
            OptionGroup::Network => "网络设置",
            OptionGroup::Advanced => "高级设置",
            OptionGroup::Compat => "兼容性选项",
        }
    }
}

/// 折叠分组控制器，各分组互不影响
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupController {
    expanded: HashSet<OptionGroup>,
}

impl GroupController {
    /// 默认展开基本选项
    pub fn new() -> Self {
        Self {
            expanded: HashSet::from([OptionGroup::Basic]),
        }
    }

    /// 切换展开状态，返回切换后的状态
    pub fn toggle(&mut self, group: OptionGroup) -> bool {
        if !self.expanded.remove(&group) {
            self.expanded.insert(group);
            return true;
        }
        false
    }

    pub fn is_expanded(&self, group: OptionGroup) -> bool {
        self.expanded.contains(&group)
    }
}

impl Default for GroupController {
    fn default() -> Self {
        Self::new()
    }
}
