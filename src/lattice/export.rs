//! # 晶格数据导出
//!
//! 导出采样后的各图层位置。
//!
//! ## 支持格式
//! - XYZ: 标准原子坐标格式，元素标签可配置
//! - CSV: `layer,x,y,z`
//! - JSON: `{lattice, mode, cellsPerAxis, layers: {base, speciesA, speciesB, interstitial}}`
//!
//! ## 依赖关系
//! - 被 `commands/lattice.rs` 调用
//! - 使用 `lattice/sampler.rs` 的 SiteAssignment
//! - 使用 `csv` 与 `serde_json` 写入文件

use crate::error::{HydrolabError, Result};
use crate::lattice::sampler::SiteAssignment;
use crate::models::{Lattice, Mode, PositionBuffer};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 各图层的元素标签
#[derive(Debug, Clone)]
pub struct SpeciesLabels {
    pub base: String,
    pub species_a: String,
    pub species_b: String,
    pub interstitial: String,
}

impl Default for SpeciesLabels {
    fn default() -> Self {
        SpeciesLabels {
            base: "Fe".to_string(),
            species_a: "C".to_string(),
            species_b: "V".to_string(),
            interstitial: "H".to_string(),
        }
    }
}

impl SpeciesLabels {
    /// 按 (标签, 位置) 顺序遍历四个图层
    fn layers<'a>(
        &'a self,
        assignment: &'a SiteAssignment,
    ) -> [(&'a str, &'a PositionBuffer); 4] {
        [
            (self.base.as_str(), &assignment.base),
            (self.species_a.as_str(), &assignment.species_a),
            (self.species_b.as_str(), &assignment.species_b),
            (self.interstitial.as_str(), &assignment.interstitial),
        ]
    }
}

/// JSON 导出结构
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatticeExport<'a> {
    lattice: Lattice,
    mode: Mode,
    cells_per_axis: usize,
    layers: &'a SiteAssignment,
}

/// 生成 XYZ 格式字符串
pub fn to_xyz_string(assignment: &SiteAssignment, labels: &SpeciesLabels, comment: &str) -> String {
    let layers = labels.layers(assignment);
    let count: usize = layers.iter().map(|(_, p)| p.len()).sum();

    let mut result = String::new();
    result.push_str(&format!("{}\n", count));
    result.push_str(&format!("{}\n", comment));
    for (element, positions) in layers {
        for p in positions.iter() {
            result.push_str(&format!(
                "{} {:16.10} {:16.10} {:16.10}\n",
                element, p[0], p[1], p[2]
            ));
        }
    }
    result
}

/// 导出为 XYZ 文件
pub fn to_xyz(
    assignment: &SiteAssignment,
    labels: &SpeciesLabels,
    comment: &str,
    output_path: &Path,
) -> Result<()> {
    let content = to_xyz_string(assignment, labels, comment);
    let mut file = File::create(output_path).map_err(|e| HydrolabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| HydrolabError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })
}

/// 导出为 CSV 文件
pub fn to_csv(assignment: &SiteAssignment, labels: &SpeciesLabels, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["layer", "x", "y", "z"])?;
    for (element, positions) in labels.layers(assignment) {
        for p in positions.iter() {
            wtr.write_record([
                element.to_string(),
                format!("{:.6}", p[0]),
                format!("{:.6}", p[1]),
                format!("{:.6}", p[2]),
            ])?;
        }
    }

    wtr.flush().map_err(|e| HydrolabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出为 JSON 文件
pub fn to_json(
    assignment: &SiteAssignment,
    lattice: Lattice,
    mode: Mode,
    cells_per_axis: usize,
    output_path: &Path,
) -> Result<()> {
    let file = File::create(output_path).map_err(|e| HydrolabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    let payload = LatticeExport {
        lattice,
        mode,
        cells_per_axis,
        layers: assignment,
    };
    write_json(&payload, file, &output_path.display().to_string())
}

/// 序列化并显式刷新，写入错误不会在 drop 时丢失
fn write_json<T: Serialize, W: Write>(payload: &T, sink: W, path: &str) -> Result<()> {
    let mut writer = BufWriter::new(sink);
    serde_json::to_writer_pretty(&mut writer, payload)?;
    writer.flush().map_err(|e| HydrolabError::FileWriteError {
        path: path.to_string(),
        source: e,
    })
}
