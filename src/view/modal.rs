use crate::common::models::Task;

/// 模态框内的点击位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    CloseButton,
    Backdrop, // 内容区域之外
    Content,
}

/// 任务详情模态框
#[derive(Debug, Clone, Default)]
pub struct ModalController {
    task: Option<Task>,
}

impl ModalController {
    pub fn open(&mut self, task: Task) {
        self.task = Some(task);
    }

    pub fn close(&mut self) {
        self.task = None;
    }

    /// 点击关闭按钮或遮罩时关闭，点击内容不做处理
    pub fn click(&mut self, target: ModalClick) {
        match target {
            ModalClick::CloseButton | ModalClick::Backdrop => self.close(),
            ModalClick::Content => {}
        }
    }

    pub fn is_visible(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }
}
