pub mod app;
pub mod common;
pub mod config;
pub mod render;
pub mod view;

pub use app::{PanelController, PanelError};
pub use common::api::{ApiError, Endpoint, TaskApi, TaskClient};
pub use config::PanelConfig;
