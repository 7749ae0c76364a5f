//! # 数据模型模块
//!
//! 定义晶格几何与扩散系数数据集的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `lattice/`, `diffusivity/` 和 `commands/` 使用
//! - 子模块: lattice, diffusivity

pub mod diffusivity;
pub mod lattice;

pub use diffusivity::{BandType, GroupDescriptor, Material, Model, Sample, Segment};
pub use lattice::{GenerationParams, Lattice, Mode, Position, PositionBuffer, SiteScope};
