//! # diffusivity render-all 子命令实现
//!
//! 为数据集中每个分组并行生成单独的曲线图。
//!
//! ## 功能
//! - 可按搜索词过滤分组
//! - rayon 并行渲染，进度条显示
//! - 已存在的输出默认跳过
//! - 成功/跳过/失败汇总
//!
//! ## 依赖关系
//! - 使用 `cli/diffusivity.rs` 定义的 RenderAllArgs
//! - 使用 `batch/` 模块进行并行处理
//! - 使用 `diffusivity/` 模块进行采样与绘图

use super::print_no_groups;
use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::diffusivity::{ChartFormat, RenderAllArgs};
use crate::diffusivity::{generate_diffusivity_plot, prepare_series, ChartOptions, Dataset};
use crate::error::{HydrolabError, Result};
use crate::models::GroupDescriptor;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 批量渲染配置
struct RenderConfig {
    output_dir: PathBuf,
    format: ChartFormat,
    options: ChartOptions,
    overwrite: bool,
}

/// 执行批量渲染
pub fn execute(dataset: &Dataset, args: RenderAllArgs) -> Result<()> {
    output::print_header("Diffusivity Batch Rendering");

    if dataset.is_empty() {
        print_no_groups();
        return Ok(());
    }

    let groups = dataset.filter(args.query.as_deref().unwrap_or(""));
    if groups.is_empty() {
        output::print_empty_state("No groups match the query");
        return Ok(());
    }
    output::print_info(&format!("Rendering {} groups", groups.len()));

    fs::create_dir_all(&args.output).map_err(|e| HydrolabError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = RenderConfig {
        output_dir: args.output.clone(),
        format: args.format,
        options: ChartOptions {
            width: args.width,
            height: args.height,
            unit: args.unit.into(),
            use_svg: args.format == ChartFormat::Svg,
            ..ChartOptions::default()
        },
        overwrite: args.overwrite,
    };

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Using {} parallel jobs", runner.jobs()));
    let result = runner.run(groups, |group| render_group(group, &config))?;

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed groups:");
        for (group, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", group, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 渲染单个分组
fn render_group(group: &GroupDescriptor, config: &RenderConfig) -> ProcessResult {
    let output_file = output_path(&config.output_dir, &group.id, config.format);

    if output_file.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    let series = prepare_series(&[group], None, None);
    let options = ChartOptions {
        title: group.label.clone(),
        ..config.options.clone()
    };

    match generate_diffusivity_plot(&series, &[], &output_file, &options) {
        Ok(true) => ProcessResult::Success(format!("{} -> {}", group.id, output_file.display())),
        Ok(false) => ProcessResult::Skipped(format!("{}: no valid samples", group.id)),
        Err(e) => ProcessResult::Failed(group.id.clone(), e.to_string()),
    }
}

/// 由分组 id 构造安全的文件名
fn output_path(dir: &Path, group_id: &str, format: ChartFormat) -> PathBuf {
    let stem: String = group_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("{}.{}", stem, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_sanitized() {
        let path = output_path(Path::new("charts"), "Smith 1999/ferrite_min", ChartFormat::Svg);
        assert_eq!(path, Path::new("charts").join("Smith_1999_ferrite_min.svg"));
    }

    #[test]
    fn test_existing_output_skipped() {
        let dir = std::env::temp_dir().join("hydrolab_render_all");
        fs::create_dir_all(&dir).unwrap();
        let existing = dir.join("g.png");
        fs::write(&existing, b"placeholder").unwrap();

        let group = GroupDescriptor {
            id: "g".to_string(),
            label: "g".to_string(),
            source_id: None,
            source_title: "test".to_string(),
            temperature_range: [300.0, 400.0],
            segments: Vec::new(),
            band: crate::models::BandType::None,
            material_label: None,
        };
        let config = RenderConfig {
            output_dir: dir,
            format: ChartFormat::Png,
            options: ChartOptions::default(),
            overwrite: false,
        };
        assert!(matches!(
            render_group(&group, &config),
            ProcessResult::Skipped(_)
        ));
    }

    #[test]
    fn test_group_without_samples_skipped() {
        let dir = std::env::temp_dir().join("hydrolab_render_all_empty");
        let group = GroupDescriptor {
            id: "empty".to_string(),
            label: "empty".to_string(),
            source_id: None,
            source_title: "test".to_string(),
            temperature_range: [300.0, 400.0],
            segments: Vec::new(),
            band: crate::models::BandType::None,
            material_label: None,
        };
        let config = RenderConfig {
            output_dir: dir,
            format: ChartFormat::Png,
            options: ChartOptions::default(),
            overwrite: true,
        };
        assert!(matches!(
            render_group(&group, &config),
            ProcessResult::Skipped(_)
        ));
    }
}
