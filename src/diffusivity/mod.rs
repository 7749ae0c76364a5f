//! # 氢扩散系数模块
//!
//! 数据集加载、模型求值、曲线采样、图表绘制与导出。
//!
//! ## 依赖关系
//! - 被 `commands/diffusivity/` 调用
//! - 使用 `models/diffusivity.rs` 数据结构
//! - 子模块: dataset, model, sampler, plot, export

pub mod dataset;
pub mod export;
pub mod model;
pub mod plot;
pub mod sampler;

pub use dataset::{load_dataset, Dataset};
pub use plot::{generate_diffusivity_plot, ChartOptions};
pub use sampler::{collect_envelopes, prepare_series, Series, TemperatureUnit};
