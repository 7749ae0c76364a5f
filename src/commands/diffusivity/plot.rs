//! # diffusivity plot 子命令实现
//!
//! 对选中分组采样、绘制对数纵轴图表，并可导出 CSV/JSON。
//!
//! ## 功能
//! - 温度窗口以显示单位给出，采样前转换为开尔文
//! - min/max 散布带成对出现时绘制包络
//! - 采样统计表格
//! - 无有效采样点时只打印提示，不生成图表
//!
//! ## 依赖关系
//! - 使用 `cli/diffusivity.rs` 定义的 PlotArgs
//! - 使用 `diffusivity/` 模块进行采样、绘图与导出

use super::{parse_range, print_no_groups};
use crate::cli::diffusivity::{ChartFormat, PlotArgs};
use crate::diffusivity::plot::legend_numbers;
use crate::diffusivity::{
    collect_envelopes, export, generate_diffusivity_plot, prepare_series, ChartOptions, Dataset,
    Series, TemperatureUnit,
};
use crate::error::{HydrolabError, Result};
use crate::models::GroupDescriptor;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 采样统计行
#[derive(Debug, Clone, Tabled)]
struct SeriesRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Group")]
    group_id: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Points")]
    points: usize,
    #[tabled(rename = "T range")]
    temperature: String,
    #[tabled(rename = "D range (mm²/s)")]
    diffusivity: String,
}

/// 执行绘图
pub fn execute(dataset: &Dataset, args: PlotArgs) -> Result<()> {
    output::print_header("Hydrogen Diffusivity Plot");

    if dataset.is_empty() {
        print_no_groups();
        return Ok(());
    }

    let unit: TemperatureUnit = args.unit.into();
    let (clamp_min, clamp_max) = match args.range.as_deref() {
        Some(range) => {
            let (lo, hi) = parse_range(range)?;
            (Some(unit.to_kelvin(lo)), Some(unit.to_kelvin(hi)))
        }
        None => (None, None),
    };

    let selected = select_groups(dataset, &args.groups)?;
    let series = prepare_series(&selected, clamp_min, clamp_max);
    let envelopes = if args.no_envelope {
        Vec::new()
    } else {
        collect_envelopes(&selected, clamp_min, clamp_max)
    };

    print_series_table(&series, unit);
    if !envelopes.is_empty() {
        output::print_info(&format!(
            "Scatter band envelopes: {}",
            envelopes
                .iter()
                .map(|e| e.base_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    if series.iter().all(|s| s.samples.is_empty()) {
        output::print_empty_state("No valid samples for the selected groups in this temperature window");
        return Ok(());
    }

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));
    let options = ChartOptions {
        title: args.title.clone(),
        width: args.width,
        height: args.height,
        unit,
        numbering: args.numbering,
        use_svg: format == ChartFormat::Svg,
    };

    if generate_diffusivity_plot(&series, &envelopes, &args.output, &options)? {
        output::print_saved("Chart", &args.output.display().to_string());
    }

    if let Some(ref path) = args.csv {
        export::to_csv(&series, unit, path)?;
        let rows = export::read_csv_file(path)?;
        output::print_saved(
            "CSV",
            &format!("{} ({} rows)", path.display(), rows.len()),
        );
    }
    if let Some(ref path) = args.json {
        export::to_json(&series, unit, path)?;
        output::print_saved("JSON", &path.display().to_string());
    }

    Ok(())
}

/// 按请求顺序解析分组；未知 id 被跳过，全部未知时报错
fn select_groups<'a>(dataset: &'a Dataset, ids: &[String]) -> Result<Vec<&'a GroupDescriptor>> {
    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        match dataset.get(id) {
            Some(group) if !selected.iter().any(|g: &&GroupDescriptor| g.id == group.id) => {
                selected.push(group)
            }
            Some(_) => output::print_skip(&format!("Group '{}' selected twice", id)),
            None => output::print_warning(&format!("Unknown group '{}', skipping", id)),
        }
    }

    if selected.is_empty() {
        return Err(HydrolabError::UnknownGroup(ids.join(", ")));
    }
    Ok(selected)
}

fn series_rows(series: &[Series], unit: TemperatureUnit) -> Vec<SeriesRow> {
    series
        .iter()
        .zip(legend_numbers(series))
        .map(|(s, number)| SeriesRow {
            number: number.map_or_else(|| "-".to_string(), |n| n.to_string()),
            group_id: s.group_id.clone(),
            band: s.band.to_string(),
            points: s.samples.len(),
            temperature: s
                .temperature_range()
                .map(|(lo, hi)| {
                    format!("{:.0}-{:.0} {}", unit.to_axis(lo), unit.to_axis(hi), unit)
                })
                .unwrap_or_else(|| "-".to_string()),
            diffusivity: s
                .diffusivity_range()
                .map(|(lo, hi)| format!("{:.3e} - {:.3e}", lo, hi))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

fn print_series_table(series: &[Series], unit: TemperatureUnit) {
    println!("{}", Table::new(series_rows(series, unit)));
}

/// 从文件扩展名推断图表格式
fn guess_format_from_extension(path: &Path) -> ChartFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => ChartFormat::Svg,
        _ => ChartFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::diffusivity::UnitKind;
    use crate::diffusivity::dataset::parse_dataset;
    use std::path::PathBuf;

    const BUNDLE: &str = r#"{
        "groups": [
            {"group_id": "steel_min",
             "segments": [{"entry_id": "1", "model": {"type": "arrhenius", "D0_mm2_per_s": 0.05, "Q_J_per_mol": 40000},
                           "temperature_validity_K": [300, 600]}]},
            {"group_id": "steel_max",
             "segments": [{"entry_id": "2", "model": {"type": "arrhenius", "D0_mm2_per_s": 0.5, "Q_J_per_mol": 40000},
                           "temperature_validity_K": [350, 650]}]}
        ]
    }"#;

    fn plot_args(groups: &[&str], range: Option<&str>) -> PlotArgs {
        let dir = std::env::temp_dir().join("hydrolab_plot_cmd");
        std::fs::create_dir_all(&dir).unwrap();
        PlotArgs {
            groups: groups.iter().map(|s| s.to_string()).collect(),
            range: range.map(str::to_string),
            unit: UnitKind::K,
            no_envelope: false,
            numbering: false,
            output: dir.join("never_written.png"),
            format: None,
            csv: Some(dir.join("series.csv")),
            json: None,
            title: "test".to_string(),
            width: 400,
            height: 300,
        }
    }

    #[test]
    fn test_select_groups() {
        let dataset = parse_dataset(BUNDLE).unwrap();
        let ids = vec![
            "steel_max".to_string(),
            "nope".to_string(),
            "steel_max".to_string(),
        ];
        let selected = select_groups(&dataset, &ids).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "steel_max");

        let result = select_groups(&dataset, &["nope".to_string()]);
        assert!(matches!(result, Err(HydrolabError::UnknownGroup(_))));
    }

    #[test]
    fn test_empty_window_writes_nothing() {
        let dataset = parse_dataset(BUNDLE).unwrap();
        let args = plot_args(&["steel_min"], Some("1000-1200"));
        let output = args.output.clone();
        let _ = std::fs::remove_file(&output);

        execute(&dataset, args).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_dataset_is_not_an_error() {
        let args = plot_args(&["steel_min"], None);
        assert!(execute(&Dataset::default(), args).is_ok());
    }

    #[test]
    fn test_series_rows_match_legend_numbers() {
        let dataset = parse_dataset(BUNDLE).unwrap();
        let selected = select_groups(
            &dataset,
            &["steel_min".to_string(), "steel_max".to_string()],
        )
        .unwrap();
        // 620-640 K 只落在 steel_max 的有效区间内
        let series = prepare_series(&selected, Some(620.0), Some(640.0));
        let rows = series_rows(&series, TemperatureUnit::Kelvin);
        assert_eq!(rows[0].number, "-");
        assert_eq!(rows[0].points, 0);
        assert_eq!(rows[1].number, "1");
    }

    #[test]
    fn test_guess_format() {
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("chart.SVG")),
            ChartFormat::Svg
        );
        assert_eq!(
            guess_format_from_extension(&PathBuf::from("chart.png")),
            ChartFormat::Png
        );
    }
}
