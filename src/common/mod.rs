pub mod api;
pub mod format;
pub mod logger;
pub mod models;
