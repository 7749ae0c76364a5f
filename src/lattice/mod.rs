//! # 晶格几何模块
//!
//! 生成 SC/BCC/FCC 晶格的原子位置与间隙位点，并进行可复现的随机分配。
//!
//! ## 子模块
//! - `generator`: 单胞平铺与间隙位点推导
//! - `sampler`: 替位/间隙原子的种子随机分配
//! - `render`: 点图层渲染
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/lattice.rs`, `commands/sites.rs` 使用
//! - 使用 `models/lattice.rs`, `utils/rng.rs`

pub mod export;
pub mod generator;
pub mod render;
pub mod sampler;

pub use generator::{generate_base_positions, interstitial_sites, BaseLayout};
pub use sampler::{assign, SiteAssignment};
