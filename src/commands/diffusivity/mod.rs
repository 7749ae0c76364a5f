//! # diffusivity 命令实现
//!
//! 氢扩散系数曲线统一入口，包含多个子命令：
//! - `list`: 列出/搜索分组
//! - `plot`: 绘制选中分组
//! - `render-all`: 批量生成单分组图表
//!
//! 数据集加载失败不是致命错误：打印警告后以空数据集继续，
//! 各子命令随后显示 "no groups" 状态。
//!
//! ## 依赖关系
//! - 使用 `cli/diffusivity.rs` 定义的参数
//! - 使用 `diffusivity/dataset.rs` 加载数据集
//! - 子模块: list, plot, render_all

pub mod list;
pub mod plot;
pub mod render_all;

use crate::cli::diffusivity::{DiffusivityArgs, DiffusivityCommands};
use crate::diffusivity::{load_dataset, Dataset};
use crate::error::{HydrolabError, Result};
use crate::utils::{output, progress};

/// 执行 diffusivity 命令
pub fn execute(args: DiffusivityArgs) -> Result<()> {
    let dataset = load_or_empty(&args.dataset);

    match args.command {
        DiffusivityCommands::List(list_args) => list::execute(&dataset, list_args),
        DiffusivityCommands::Plot(plot_args) => plot::execute(&dataset, plot_args),
        DiffusivityCommands::RenderAll(render_args) => render_all::execute(&dataset, render_args),
    }
}

/// 加载数据集；失败时降级为空数据集
pub fn load_or_empty(source: &str) -> Dataset {
    let spinner = progress::create_spinner(&format!("Loading dataset '{}'...", source));
    let result = load_dataset(source);
    spinner.finish_and_clear();

    match result {
        Ok(dataset) => {
            output::print_info(&format!(
                "Loaded {} groups from '{}'{}",
                dataset.len(),
                source,
                dataset
                    .generated_at
                    .as_deref()
                    .map(|t| format!(" (generated {})", t))
                    .unwrap_or_default()
            ));
            dataset
        }
        Err(e) => {
            output::print_warning(&format!("Dataset unavailable: {}", e));
            Dataset::default()
        }
    }
}

/// 空数据集提示
pub fn print_no_groups() {
    output::print_empty_state("No groups available in the dataset");
}

/// 解析温度窗口 "min-max"（允许负数，如 "-50-300"）
pub fn parse_range(range: &str) -> Result<(f64, f64)> {
    let invalid = || HydrolabError::InvalidRange(range.to_string());

    let bytes = range.as_bytes();
    let split = (1..bytes.len())
        .find(|&i| bytes[i] == b'-' && !matches!(bytes[i - 1], b'e' | b'E' | b'-'))
        .ok_or_else(invalid)?;

    let min: f64 = range[..split].trim().parse().map_err(|_| invalid())?;
    let max: f64 = range[split + 1..].trim().parse().map_err(|_| invalid())?;

    if !min.is_finite() || !max.is_finite() || max <= min {
        return Err(HydrolabError::InvalidRange(format!(
            "{} (must be min < max)",
            range
        )));
    }

    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("300-900").unwrap(), (300.0, 900.0));
        assert_eq!(parse_range("-50-300").unwrap(), (-50.0, 300.0));
        assert_eq!(parse_range("-80--20").unwrap(), (-80.0, -20.0));
        assert_eq!(parse_range("2.5e2-1e3").unwrap(), (250.0, 1000.0));
        assert!(parse_range("900-300").is_err());
        assert!(parse_range("300").is_err());
        assert!(parse_range("a-b").is_err());
    }

    #[test]
    fn test_missing_dataset_degrades_to_empty() {
        let dataset = load_or_empty("/nonexistent/hdd-groups.json");
        assert!(dataset.is_empty());
    }
}
