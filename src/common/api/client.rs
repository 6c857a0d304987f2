use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use tracing::{debug, error};

use super::endpoint::Endpoint;
use super::error::ApiError;
use crate::common::models::{OptionSet, Task};

pub const TASKS_PATH: &str = "/api/Tasks";

// -----------------------------------------------------------------------------------------------

/// 任务服务器接口
///
/// 控制器只依赖这个 trait，测试时可以换成脚本化的实现。
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// 切换到新的服务器地址
    fn update_connection(&self, endpoint: &Endpoint);

    /// 获取全部任务
    async fn get_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// 创建任务，选项与 `Url` 字段平铺在同一个对象里
    async fn add_task(&self, url: &str, options: &OptionSet) -> Result<Value, ApiError>;

    /// 移除任务，重复调用是否安全由服务器决定
    async fn remove_task(&self, aid: &str) -> Result<Value, ApiError>;

    async fn get_task_detail(&self, aid: &str) -> Result<Task, ApiError>;

    /// 测试连接，任何错误都只返回 false
    async fn test_connection(&self) -> bool {
        self.get_tasks().await.is_ok()
    }
}

// -----------------------------------------------------------------------------------------------

/// 基于 reqwest 的任务服务器客户端
#[derive(Debug)]
pub struct TaskClient {
    inner: Client,
    endpoint: RwLock<Endpoint>,
}

impl TaskClient {
    pub fn new(endpoint: Endpoint) -> Result<Self, ApiError> {
        Self::with_timeout(endpoint, None)
    }

    /// 默认不设置超时，交给底层传输决定
    pub fn with_timeout(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = ClientBuilder::new().default_headers(Self::get_default_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            endpoint: RwLock::new(endpoint),
        })
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    pub fn endpoint(&self) -> Endpoint {
        match self.endpoint.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn tasks_url(&self) -> Result<Url, ApiError> {
        self.endpoint().join(TASKS_PATH)
    }

    // AID 作为单独的路径段追加，特殊字符按路径规则转义
    fn task_url(&self, aid: &str) -> Result<Url, ApiError> {
        let mut url = self.tasks_url()?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(aid.to_string()))?
            .push(aid);
        Ok(url)
    }

    // 通用请求
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, url);

        let mut req = self.inner.request(method, url);
        if let Some(body) = body {
            req = req.body(serde_json::to_vec(body)?);
        }

        let resp = req.send().await.map_err(|e| {
            error!("API请求失败: {}", e);
            ApiError::from(e)
        })?;

        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            error!("API请求失败: HTTP {}", status.as_u16());
            return Err(ApiError::Status {
                code: status.as_u16(),
                reason,
            });
        }

        let raw_body = resp.bytes().await?;

        // 删除等接口可能返回空响应体
        let json_value: Value = if raw_body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&raw_body).map_err(|e| {
                ApiError::InvalidResponse(format!(
                    "{}. 原始响应: {}",
                    e,
                    String::from_utf8_lossy(&raw_body)
                ))
            })?
        };

        serde_json::from_value::<T>(json_value)
            .map_err(|e| ApiError::InvalidResponse(format!("解析响应失败: {}", e)))
    }
}

#[async_trait]
impl TaskApi for TaskClient {
    fn update_connection(&self, endpoint: &Endpoint) {
        match self.endpoint.write() {
            Ok(mut guard) => *guard = endpoint.clone(),
            Err(poisoned) => *poisoned.into_inner() = endpoint.clone(),
        }
    }

    async fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.request(Method::GET, self.tasks_url()?, None).await
    }

    async fn add_task(&self, url: &str, options: &OptionSet) -> Result<Value, ApiError> {
        let mut task_data = OptionSet::new();
        task_data.insert("Url".to_string(), Value::String(url.to_string()));
        for (key, value) in options {
            task_data.insert(key.clone(), value.clone());
        }

        self.request(Method::POST, self.tasks_url()?, Some(&Value::Object(task_data)))
            .await
    }

    async fn remove_task(&self, aid: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, self.task_url(aid)?, None)
            .await
    }

    async fn get_task_detail(&self, aid: &str) -> Result<Task, ApiError> {
        self.request(Method::GET, self.task_url(aid)?, None)
            .await
    }

    // 只要求状态码成功且响应是合法 JSON，不校验任务结构
    async fn test_connection(&self) -> bool {
        let Ok(url) = self.tasks_url() else {
            return false;
        };
        self.request::<Value>(Method::GET, url, None).await.is_ok()
    }
}
