//! 纯本地的界面状态：选项卡、折叠分组、详情模态框和通知。

pub mod groups;
pub mod modal;
pub mod notifications;
pub mod tabs;

pub use groups::{GroupController, OptionGroup};
pub use modal::{ModalClick, ModalController};
pub use notifications::{Notification, NotificationCenter, NotificationLevel};
pub use tabs::{Tab, TabController};
