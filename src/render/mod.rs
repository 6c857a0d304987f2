//! HTML 渲染。所有函数都是纯函数，只读取任务或 [`DashboardView`](crate::app::DashboardView)。

pub mod detail;
pub mod escape;
pub mod page;
pub mod rows;
pub mod status;

pub use detail::detail_panel;
pub use page::render_dashboard;
pub use rows::{table_body, task_row};
pub use status::{StatusBadge, status_badge};
