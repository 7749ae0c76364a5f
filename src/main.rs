//! # Hydrolab - 晶格间隙氢与氢扩散系数工具箱
//!
//! 两条独立的计算流水线，统一成单一可执行文件。
//!
//! ## 子命令
//! - `lattice` - 生成 SC/BCC/FCC 晶格、替位物种与间隙 H，渲染或导出
//! - `sites` - 列出单胞的四面体/八面体间隙位点
//! - `diffusivity` - 氢扩散系数曲线
//!   - `list` - 列出/搜索数据集分组
//!   - `plot` - 对数纵轴曲线图与 CSV/JSON 导出
//!   - `render-all` - 并行批量生成单分组图表
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/          (命令行参数定义)
//!   ├── commands/     (命令执行逻辑，调用以下领域模块)
//!   ├── lattice/      (晶格生成、采样、渲染、导出)
//!   ├── diffusivity/  (数据集、模型求值、采样、图表、导出)
//!   ├── batch/        (并行批处理)
//!   ├── models/       (数据模型)
//!   ├── utils/        (输出、进度条、随机数)
//!   └── error.rs      (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod diffusivity;
mod error;
mod lattice;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
