use thiserror::Error;

use crate::common::api::ApiError;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("{0}")]
    Validation(String),

    #[error("请先连接到服务器")]
    NotConnected,

    #[error("连接失败: {0}")]
    ConnectFailed(String),

    // 结果返回时已经有更新的连接或刷新
    #[error("操作已被新的请求取代")]
    Superseded,

    #[error(transparent)]
    Api(#[from] ApiError),
}
