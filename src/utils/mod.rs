//! # 工具函数模块
//!
//! 提供美化输出、进度条与可复现随机数生成器。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `lattice/` 模块使用
//! - 子模块: output, progress, rng

pub mod output;
pub mod progress;
pub mod rng;
