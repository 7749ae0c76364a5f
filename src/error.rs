//! # 统一错误处理模块
//!
//! 定义 Hydrolab 的所有错误类型，使用 `thiserror` 派生。
//!
//! 核心生成与求值函数（晶格生成、位点采样、模型求值、曲线采样）是全函数，
//! 不返回错误；只有 I/O 边界（读取数据集、写出导出文件、绘图）返回 `Result`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Hydrolab 统一错误类型
#[derive(Error, Debug)]
pub enum HydrolabError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 数据集错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to fetch dataset from {url}\nReason: {reason}")]
    FetchError { url: String, reason: String },

    #[error("Malformed dataset: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown group id: {0}")]
    UnknownGroup(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, HydrolabError>;
