//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型
//! - 日志、时间、ID 等工具

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, ErrorBody};

/// Application-level Result type, used in HTTP handlers and services
pub type AppResult<T> = Result<T, AppError>;
