//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `lattice`: 生成晶格与氢间隙位置，渲染或导出
//! - `sites`: 列出间隙位点目录
//! - `diffusivity`: 氢扩散系数曲线（嵌套子命令）
//!   - `list`: 列出/搜索数据集分组
//!   - `plot`: 绘制选中分组
//!   - `render-all`: 为每个分组批量生成图表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: lattice, diffusivity

pub mod diffusivity;
pub mod lattice;

use clap::{Parser, Subcommand};

/// Hydrolab - 晶格间隙氢与氢扩散系数工具箱
#[derive(Parser)]
#[command(name = "hydrolab")]
#[command(version)]
#[command(about = "Crystal lattice interstitial hydrogen and diffusivity toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate SC/BCC/FCC lattice positions with substitutional and interstitial species
    Lattice(lattice::LatticeArgs),

    /// List tetrahedral and octahedral interstitial sites of a unit cell
    Sites(lattice::SitesArgs),

    /// Explore hydrogen diffusivity curves from a dataset bundle
    Diffusivity(diffusivity::DiffusivityArgs),
}
