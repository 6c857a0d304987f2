/// 危险操作前的确认提示
pub trait Confirm: Send + Sync {
    /// 返回 true 表示用户同意
    fn confirm(&self, prompt: &str) -> bool;
}

/// 固定回答，用于 `--yes` 或测试
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
