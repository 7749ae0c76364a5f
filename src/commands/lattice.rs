//! # lattice 子命令实现
//!
//! 截断参数 → 生成基体原子 → 分配替位/间隙物种 → 渲染或导出。
//!
//! ## 功能
//! - 演示模式：单个惯用单胞，显示四面体/八面体位点标记
//! - 晶格模式：平铺超胞，替位物种与平铺的间隙 H
//! - 输出 PNG/SVG 渲染，或 XYZ/CSV/JSON 坐标
//!
//! ## 依赖关系
//! - 使用 `cli/lattice.rs` 定义的 LatticeArgs
//! - 使用 `lattice/` 模块进行生成、采样、渲染与导出

use crate::cli::lattice::{LatticeArgs, LatticeOutputFormat};
use crate::error::{HydrolabError, Result};
use crate::lattice::export::{self, SpeciesLabels};
use crate::lattice::render::{self, PointLayer};
use crate::lattice::{assign, generate_base_positions, interstitial_sites, BaseLayout, SiteAssignment};
use crate::models::{GenerationParams, Mode};
use crate::utils::{output, progress};

use std::path::Path;

/// 位点标记透明度
const SITE_MARKER_ALPHA: f64 = 0.45;

/// 执行晶格生成
pub fn execute(args: LatticeArgs) -> Result<()> {
    output::print_header("Lattice Generation");

    let requested = args.params();
    let params = requested.clamped();
    if params != requested {
        output::print_warning("Some parameters were out of range and have been clamped");
    }

    let labels = parse_labels(&args.labels)?;

    let spinner = progress::create_spinner("Generating positions...");
    let target = match params.mode {
        Mode::Demo => params.lattice.demo_atom_count(),
        Mode::Lattice => params.target_count(),
    };
    let layout = generate_base_positions(params.lattice, target);
    let assignment = assign(&layout, &params, params.seed);
    spinner.finish_and_clear();

    output::print_info(&format!(
        "{} {} mode: {} cells per axis, {} atoms per cell",
        params.lattice,
        params.mode,
        layout.cells_per_axis,
        layout.atoms_per_cell
    ));
    print_badge(&assignment, &labels);

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));

    match format {
        LatticeOutputFormat::Png | LatticeOutputFormat::Svg => {
            render_assignment(&args, &params, &layout, &assignment, format)?
        }
        LatticeOutputFormat::Xyz => {
            let comment = format!(
                "{} {} seed={} cells_per_axis={}",
                params.lattice, params.mode, params.seed, layout.cells_per_axis
            );
            export::to_xyz(&assignment, &labels, &comment, &args.output)?
        }
        LatticeOutputFormat::Csv => export::to_csv(&assignment, &labels, &args.output)?,
        LatticeOutputFormat::Json => export::to_json(
            &assignment,
            params.lattice,
            params.mode,
            layout.cells_per_axis,
            &args.output,
        )?,
    }

    output::print_saved(&format!("{:?}", format), &args.output.display().to_string());
    Ok(())
}

/// 渲染各图层
fn render_assignment(
    args: &LatticeArgs,
    params: &GenerationParams,
    layout: &BaseLayout,
    assignment: &SiteAssignment,
    format: LatticeOutputFormat,
) -> Result<()> {
    let r0 = params.lattice.base_atomic_radius();
    let base_radius = r0 * params.fe_size;

    let sites = interstitial_sites(params.lattice, params.site_scope);
    let show_sites = params.mode == Mode::Demo && !args.hide_sites;
    let site_radius = base_radius * params.site_size;

    let mut layers = Vec::with_capacity(6);
    layers.push(PointLayer::new(&assignment.base, base_radius, render::BASE_COLOR));
    layers.push(PointLayer::new(
        &assignment.species_a,
        base_radius * params.c_size,
        render::SPECIES_A_COLOR,
    ));
    layers.push(PointLayer::new(
        &assignment.species_b,
        base_radius * params.v_size,
        render::SPECIES_B_COLOR,
    ));
    if show_sites {
        layers.push(
            PointLayer::new(&sites.tetra, site_radius, render::TETRA_COLOR)
                .with_alpha(SITE_MARKER_ALPHA),
        );
        layers.push(
            PointLayer::new(&sites.octa, site_radius, render::OCTA_COLOR)
                .with_alpha(SITE_MARKER_ALPHA),
        );
    }
    layers.push(PointLayer::new(
        &assignment.interstitial,
        base_radius * params.h_size,
        render::HYDROGEN_COLOR,
    ));

    let title = format!(
        "{} {} ({} atoms, {} H)",
        params.lattice,
        params.mode,
        assignment.lattice_total(),
        assignment.interstitial.len()
    );

    render::render_layers(
        &layers,
        Some(layout.positions.as_slice()),
        &args.output,
        &title,
        args.width,
        args.height,
        format == LatticeOutputFormat::Svg,
    )
}

/// 打印 `base | A | B | H` 计数表
fn print_badge(assignment: &SiteAssignment, labels: &SpeciesLabels) {
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record([
        labels.base.as_str(),
        labels.species_a.as_str(),
        labels.species_b.as_str(),
        labels.interstitial.as_str(),
    ]);
    builder.push_record([
        assignment.base.len().to_string(),
        assignment.species_a.len().to_string(),
        assignment.species_b.len().to_string(),
        assignment.interstitial.len().to_string(),
    ]);
    println!("{}", builder.build());
}

/// 解析 `base,A,B,H` 元素标签
fn parse_labels(input: &str) -> Result<SpeciesLabels> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [base, a, b, h] if parts.iter().all(|p| !p.is_empty()) => Ok(SpeciesLabels {
            base: base.to_string(),
            species_a: a.to_string(),
            species_b: b.to_string(),
            interstitial: h.to_string(),
        }),
        _ => Err(HydrolabError::InvalidArgument(format!(
            "labels must be four comma-separated names (base,A,B,H), got '{}'",
            input
        ))),
    }
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> LatticeOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => LatticeOutputFormat::Svg,
        Some("xyz") => LatticeOutputFormat::Xyz,
        Some("csv") => LatticeOutputFormat::Csv,
        Some("json") => LatticeOutputFormat::Json,
        _ => LatticeOutputFormat::Png,
    }
}
