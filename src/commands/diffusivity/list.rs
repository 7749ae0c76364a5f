//! # diffusivity list 子命令实现
//!
//! 以表格列出数据集分组，支持不区分大小写的搜索。
//!
//! ## 依赖关系
//! - 使用 `cli/diffusivity.rs` 定义的 ListArgs
//! - 使用 `diffusivity/dataset.rs` 的 Dataset, summarize
//! - 使用 `tabled` 输出表格

use super::print_no_groups;
use crate::cli::diffusivity::ListArgs;
use crate::diffusivity::dataset::{summarize, GroupSummary};
use crate::diffusivity::Dataset;
use crate::error::Result;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 分组列表行
#[derive(Debug, Clone, Tabled)]
struct GroupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Group")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "T range (K)")]
    range: String,
    #[tabled(rename = "Segments")]
    segments: usize,
    #[tabled(rename = "Models")]
    models: String,
}

impl GroupRow {
    fn from_summary(index: usize, summary: GroupSummary) -> Self {
        Self {
            index,
            id: summary.id,
            label: summary.label,
            source: summary.source,
            material: summary.material.unwrap_or_else(|| "-".to_string()),
            range: format!(
                "{:.0}-{:.0}",
                summary.temperature_range[0], summary.temperature_range[1]
            ),
            segments: summary.segment_count,
            models: summary.models,
        }
    }
}

/// 执行分组列表
pub fn execute(dataset: &Dataset, args: ListArgs) -> Result<()> {
    output::print_header("Diffusivity Dataset Groups");

    if dataset.is_empty() {
        print_no_groups();
        return Ok(());
    }

    let rows = build_rows(dataset, args.query.as_deref());
    if rows.is_empty() {
        output::print_empty_state(&format!(
            "No groups match '{}'",
            args.query.unwrap_or_default()
        ));
        return Ok(());
    }

    println!("{}", Table::new(&rows));
    output::print_info(&format!("{} of {} groups shown", rows.len(), dataset.len()));
    Ok(())
}

fn build_rows(dataset: &Dataset, query: Option<&str>) -> Vec<GroupRow> {
    dataset
        .filter(query.unwrap_or(""))
        .into_iter()
        .enumerate()
        .map(|(i, group)| GroupRow::from_summary(i + 1, summarize(group)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diffusivity::dataset::parse_dataset;

    const BUNDLE: &str = r#"{
        "generated_at": "2025-01-01",
        "groups": [
            {"group_id": "x80_mean", "label": "X80 pipeline steel",
             "segments": [{"entry_id": "1", "model": {"type": "single_point", "diffusivity_mm2_per_s": 1e-5},
                           "temperature_validity_K": [293, 353], "material": {"designation": "X80"}}]},
            {"group_id": "ss316", "label": "316L austenitic",
             "segments": [{"entry_id": "2", "model": {"type": "arrhenius", "D0_mm2_per_s": 0.2, "Q_J_per_mol": 53000},
                           "temperature_validity_K": [300, 700]}]}
        ]
    }"#;

    #[test]
    fn test_build_rows() {
        let dataset = parse_dataset(BUNDLE).unwrap();
        let rows = build_rows(&dataset, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].material, "X80");
        assert_eq!(rows[1].material, "-");
        assert_eq!(rows[1].range, "300-700");
        assert_eq!(rows[1].models, "arrhenius");

        let filtered = build_rows(&dataset, Some("Austenitic"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "ss316");
        assert_eq!(filtered[0].index, 1);
    }
}
