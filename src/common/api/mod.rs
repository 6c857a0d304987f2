pub mod client;
pub mod endpoint;
pub mod error;

pub use client::{TaskApi, TaskClient};
pub use endpoint::Endpoint;
pub use error::ApiError;
