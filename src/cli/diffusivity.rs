//! # diffusivity 子命令 CLI 定义
//!
//! 氢扩散系数曲线统一入口，包含多个子命令：
//! - `list`: 列出/搜索数据集分组
//! - `plot`: 绘制选中分组的曲线图，可同时导出 CSV/JSON
//! - `render-all`: 为每个分组并行生成单独的图表
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/diffusivity/` 相应模块

use crate::diffusivity::TemperatureUnit;

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// Diffusivity 主命令
// ─────────────────────────────────────────────────────────────

/// diffusivity 主命令参数
#[derive(Args, Debug)]
pub struct DiffusivityArgs {
    /// Dataset bundle: local JSON path or http(s) URL
    #[arg(
        short,
        long,
        global = true,
        env = "HYDROLAB_DATASET",
        default_value = "hdd-groups.json"
    )]
    pub dataset: String,

    #[command(subcommand)]
    pub command: DiffusivityCommands,
}

/// diffusivity 子命令
#[derive(Subcommand, Debug)]
pub enum DiffusivityCommands {
    /// List dataset groups, optionally filtered by a search query
    List(ListArgs),

    /// Plot selected groups on a log-scale chart
    Plot(PlotArgs),

    /// Render one chart per group in parallel
    RenderAll(RenderAllArgs),
}

/// 温度轴单位
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum UnitKind {
    /// Kelvin
    #[default]
    K,
    /// Degrees Celsius
    C,
}

impl From<UnitKind> for TemperatureUnit {
    fn from(kind: UnitKind) -> Self {
        match kind {
            UnitKind::K => TemperatureUnit::Kelvin,
            UnitKind::C => TemperatureUnit::Celsius,
        }
    }
}

/// 图表输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChartFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

// ─────────────────────────────────────────────────────────────
// list 子命令
// ─────────────────────────────────────────────────────────────

/// list 子命令参数
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive search over label, id, source and material
    #[arg(short, long)]
    pub query: Option<String>,
}

// ─────────────────────────────────────────────────────────────
// plot 子命令
// ─────────────────────────────────────────────────────────────

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Group ids to plot (in legend order)
    #[arg(required = true)]
    pub groups: Vec<String>,

    /// Temperature window in the display unit (e.g., "300-900")
    #[arg(short, long)]
    pub range: Option<String>,

    /// Temperature axis unit
    #[arg(short, long, value_enum, default_value = "k")]
    pub unit: UnitKind,

    /// Skip the min/max scatter band envelope
    #[arg(long, default_value_t = false)]
    pub no_envelope: bool,

    /// Draw series numbers at curve ends
    #[arg(long, default_value_t = false)]
    pub numbering: bool,

    /// Chart output path
    #[arg(short, long, default_value = "diffusivity.png")]
    pub output: PathBuf,

    /// Chart format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<ChartFormat>,

    /// Also export sampled series as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Also export sampled series as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Chart title
    #[arg(long, default_value = "Hydrogen diffusivity")]
    pub title: String,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// render-all 子命令
// ─────────────────────────────────────────────────────────────

/// render-all 子命令参数
#[derive(Args, Debug)]
pub struct RenderAllArgs {
    /// Output directory
    #[arg(short, long, default_value = "diffusivity_charts")]
    pub output: PathBuf,

    /// Only render groups matching this search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Temperature axis unit
    #[arg(short, long, value_enum, default_value = "k")]
    pub unit: UnitKind,

    /// Chart format
    #[arg(short, long, value_enum, default_value = "png")]
    pub format: ChartFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 700)]
    pub height: u32,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_plot_args() {
        let cli = Cli::parse_from([
            "hydrolab",
            "diffusivity",
            "--dataset",
            "bundle.json",
            "plot",
            "steel_min",
            "steel_max",
            "--unit",
            "c",
            "--range",
            "20-500",
        ]);
        let Commands::Diffusivity(args) = cli.command else {
            panic!("expected diffusivity command");
        };
        assert_eq!(args.dataset, "bundle.json");
        let DiffusivityCommands::Plot(plot) = args.command else {
            panic!("expected plot command");
        };
        assert_eq!(plot.groups, vec!["steel_min", "steel_max"]);
        assert_eq!(TemperatureUnit::from(plot.unit), TemperatureUnit::Celsius);
        assert_eq!(plot.range.as_deref(), Some("20-500"));
    }

    #[test]
    fn test_plot_requires_groups() {
        let result = Cli::try_parse_from(["hydrolab", "diffusivity", "plot"]);
        assert!(result.is_err());
    }
}
