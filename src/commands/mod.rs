//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `lattice/`, `diffusivity/`, `models/`, `utils/`
//! - 子模块: lattice, sites, diffusivity

pub mod diffusivity;
pub mod lattice;
pub mod sites;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Lattice(args) => lattice::execute(args),
        Commands::Sites(args) => sites::execute(args),
        Commands::Diffusivity(args) => diffusivity::execute(args),
    }
}
