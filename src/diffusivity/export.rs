//! # 扩散系数数据导出
//!
//! 导出采样序列到 CSV 和 JSON。
//!
//! ## 支持格式
//! - CSV: `group_id,label,temperature_axis,diffusivity_mm2_per_s,temperature_K`
//!   温度保留 2 位小数，扩散系数为 6 位小数的指数形式（指数带符号，如 `1.500000e+0`）
//! - JSON: `[{group_id, label, samples: [{temperature_K, temperature_axis, diffusivity}]}]`
//!
//! ## 依赖关系
//! - 被 `commands/diffusivity/` 调用
//! - 使用 `diffusivity/sampler.rs` 的 Series
//! - 使用 `csv` 与 `serde_json` 读写文件

use crate::diffusivity::sampler::{Series, TemperatureUnit};
use crate::error::{HydrolabError, Result};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// CSV 表头
pub const CSV_HEADER: [&str; 5] = [
    "group_id",
    "label",
    "temperature_axis",
    "diffusivity_mm2_per_s",
    "temperature_K",
];

/// CSV 中的一行
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvRow {
    pub group_id: String,
    pub label: String,
    pub temperature_axis: f64,
    #[serde(rename = "diffusivity_mm2_per_s")]
    pub diffusivity: f64,
    #[serde(rename = "temperature_K")]
    pub temperature_k: f64,
}

#[derive(Debug, Serialize)]
struct JsonSample {
    #[serde(rename = "temperature_K")]
    temperature_k: f64,
    temperature_axis: f64,
    diffusivity: f64,
}

#[derive(Debug, Serialize)]
struct JsonSeries<'a> {
    group_id: &'a str,
    label: &'a str,
    samples: Vec<JsonSample>,
}

/// 指数形式，指数始终带符号：`format_exponential(1.5, 6)` → `1.500000e+0`
pub fn format_exponential(value: f64, digits: usize) -> String {
    let text = format!("{:.*e}", digits, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// 写入 CSV 到任意输出
pub fn write_csv<W: Write>(series: &[Series], unit: TemperatureUnit, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for s in series {
        for sample in &s.samples {
            let axis = format!("{:.2}", unit.to_axis(sample.temperature_k));
            let diffusivity = format_exponential(sample.diffusivity, 6);
            let kelvin = format!("{:.2}", sample.temperature_k);
            wtr.write_record([
                s.group_id.as_str(),
                s.label.as_str(),
                axis.as_str(),
                diffusivity.as_str(),
                kelvin.as_str(),
            ])?;
        }
    }

    wtr.flush().map_err(|e| HydrolabError::Other(e.to_string()))?;
    Ok(())
}

/// 导出为 CSV 文件
pub fn to_csv(series: &[Series], unit: TemperatureUnit, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| HydrolabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    write_csv(series, unit, BufWriter::new(file))
}

/// 从任意输入读取 CSV 行
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<CsvRow>, _>>()?;
    Ok(rows)
}

/// 读取导出的 CSV 文件
pub fn read_csv_file(path: &Path) -> Result<Vec<CsvRow>> {
    let file = File::open(path).map_err(|e| HydrolabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    read_csv(file)
}

/// 导出为 JSON 文件
pub fn to_json(series: &[Series], unit: TemperatureUnit, output_path: &Path) -> Result<()> {
    let payload: Vec<JsonSeries> = series
        .iter()
        .map(|s| JsonSeries {
            group_id: &s.group_id,
            label: &s.label,
            samples: s
                .samples
                .iter()
                .map(|p| JsonSample {
                    temperature_k: p.temperature_k,
                    temperature_axis: unit.to_axis(p.temperature_k),
                    diffusivity: p.diffusivity,
                })
                .collect(),
        })
        .collect();

    let file = File::create(output_path).map_err(|e| HydrolabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &payload)?;
    writer.flush().map_err(|e| HydrolabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
