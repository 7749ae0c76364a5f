//! # 数据集加载与归一化
//!
//! 将 JSON 数据包解码为类型化的分组描述符。
//!
//! ## 数据包格式
//! ```text
//! {
//!   generated_at, source_repo?, sources?: {id: {title}},
//!   groups: [{ group_id | id, label?, source_id?, temperature_range_K?,
//!              segments: [{ entry_id, model, temperature_validity_K,
//!                           material?, metadata?: {band?}, conditions?, reported_as? }] }]
//! }
//! ```
//!
//! ## 归一化规则
//! - 无效温度边界（缺失、非有限、Tmax ≤ Tmin）或未知模型的区段被丢弃
//! - 区段按 Tmin 升序排列；没有可用区段的分组被丢弃
//! - 散布带：元数据 `band` 优先，否则匹配 id 后缀 `_mean|_min|_max`
//!
//! ## 依赖关系
//! - 被 `commands/diffusivity/` 调用
//! - 使用 `models/diffusivity.rs`
//! - 使用 `serde_json` 解码，`reqwest` 获取远程数据包，`regex` 匹配后缀

use crate::error::{HydrolabError, Result};
use crate::models::{BandType, GroupDescriptor, Material, Model, Segment};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// 原始数据包
#[derive(Debug, Default, Deserialize)]
struct RawDataset {
    #[serde(default)]
    generated_at: Option<String>,
    #[serde(default)]
    source_repo: Option<String>,
    #[serde(default)]
    sources: HashMap<String, RawSource>,
    #[serde(default)]
    groups: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default, rename = "temperature_range_K")]
    temperature_range: Option<Vec<Value>>,
    #[serde(default)]
    segments: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default)]
    entry_id: Option<Value>,
    model: Value,
    #[serde(default, rename = "temperature_validity_K")]
    temperature_validity: Option<Vec<Value>>,
    #[serde(default)]
    material: Option<Material>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(default)]
    conditions: Option<Value>,
    #[serde(default)]
    reported_as: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    band: Option<String>,
}

/// 分组摘要（用于列表显示）
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub id: String,
    pub label: String,
    pub source: String,
    pub material: Option<String>,
    pub temperature_range: [f64; 2],
    pub segment_count: usize,
    /// 区段模型类型（去重，按出现顺序）
    pub models: String,
}

/// 归一化后的数据集，加载后只读
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub generated_at: Option<String>,
    pub groups: Vec<GroupDescriptor>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// 按 id 查找分组
    pub fn get(&self, id: &str) -> Option<&GroupDescriptor> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// 不区分大小写的子串过滤（标签、id、来源、材料）
    pub fn filter(&self, query: &str) -> Vec<&GroupDescriptor> {
        let query = query.trim().to_lowercase();
        self.groups
            .iter()
            .filter(|g| {
                if query.is_empty() {
                    return true;
                }
                let haystack = [
                    Some(g.label.as_str()),
                    Some(g.id.as_str()),
                    Some(g.source_title.as_str()),
                    g.material_label.as_deref(),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
                haystack.contains(&query)
            })
            .collect()
    }
}

/// 生成分组摘要
pub fn summarize(group: &GroupDescriptor) -> GroupSummary {
    let mut kinds: Vec<&str> = Vec::new();
    for segment in &group.segments {
        let kind = segment.model.kind();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    GroupSummary {
        id: group.id.clone(),
        label: group.label.clone(),
        source: group.source_title.clone(),
        material: group.material_label.clone(),
        temperature_range: group.temperature_range,
        segment_count: group.segments.len(),
        models: kinds.join(", "),
    }
}

/// 从本地路径或 http(s) URL 加载数据集
///
/// 单次请求，不重试；失败返回错误，由调用方降级为空数据集。
pub fn load_dataset(source: &str) -> Result<Dataset> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source)?
    } else {
        let path = Path::new(source);
        if !path.exists() {
            return Err(HydrolabError::FileNotFound {
                path: source.to_string(),
            });
        }
        fs::read_to_string(path).map_err(|e| HydrolabError::FileReadError {
            path: source.to_string(),
            source: e,
        })?
    };
    parse_dataset(&text)
}

fn fetch_remote(url: &str) -> Result<String> {
    let fetch_error = |e: reqwest::Error| HydrolabError::FetchError {
        url: url.to_string(),
        reason: e.to_string(),
    };
    reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(fetch_error)
}

/// 解析 JSON 文本并归一化
pub fn parse_dataset(text: &str) -> Result<Dataset> {
    let raw: RawDataset = serde_json::from_str(text)?;
    Ok(normalize(raw))
}

fn normalize(raw: RawDataset) -> Dataset {
    let groups = raw
        .groups
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let group: RawGroup = serde_json::from_value(value).ok()?;
            normalize_group(group, index, &raw.sources, raw.source_repo.as_deref())
        })
        .collect();

    Dataset {
        generated_at: raw.generated_at,
        groups,
    }
}

fn normalize_group(
    group: RawGroup,
    index: usize,
    sources: &HashMap<String, RawSource>,
    source_repo: Option<&str>,
) -> Option<GroupDescriptor> {
    // 空字符串视同缺失
    let id = non_empty(group.group_id)
        .or_else(|| non_empty(group.id))
        .unwrap_or_else(|| format!("group-{}", index + 1));

    let mut segments: Vec<Segment> = group
        .segments
        .into_iter()
        .filter_map(normalize_segment)
        .collect();
    if segments.is_empty() {
        return None;
    }
    segments.sort_by(|a, b| a.t_min.total_cmp(&b.t_min));

    let source_title = group
        .source_id
        .as_ref()
        .and_then(|sid| sources.get(sid))
        .and_then(|s| s.title.clone())
        .or_else(|| group.source_id.clone())
        .or_else(|| source_repo.map(str::to_string))
        .unwrap_or_else(|| "Unknown source".to_string());

    let temperature_range = group
        .temperature_range
        .as_deref()
        .and_then(finite_pair)
        .unwrap_or_else(|| range_from_segments(&segments));

    let material_label = segments
        .first()
        .and_then(|s| s.material.as_ref())
        .and_then(|m| m.label())
        .map(str::to_string);

    let band = infer_band(&id, &segments);

    Some(GroupDescriptor {
        label: non_empty(group.label).unwrap_or_else(|| id.clone()),
        id,
        source_id: group.source_id,
        source_title,
        temperature_range,
        segments,
        band,
        material_label,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn normalize_segment(value: Value) -> Option<Segment> {
    let raw: RawSegment = serde_json::from_value(value).ok()?;
    let model: Model = serde_json::from_value(raw.model).ok()?;
    let [t_min, t_max] = finite_pair(raw.temperature_validity.as_deref()?)?;
    if t_max <= t_min {
        return None;
    }

    let entry_id = match raw.entry_id {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Some(Segment {
        entry_id,
        model,
        t_min,
        t_max,
        material: raw.material,
        band_tag: raw.metadata.and_then(|m| m.band),
        conditions: raw.conditions,
        reported_as: raw.reported_as,
    })
}

/// 数字或数字字符串 → 有限浮点数
fn safe_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn finite_pair(values: &[Value]) -> Option<[f64; 2]> {
    match values {
        [lo, hi] => Some([safe_number(lo)?, safe_number(hi)?]),
        _ => None,
    }
}

fn range_from_segments(segments: &[Segment]) -> [f64; 2] {
    let t_min = segments.iter().map(|s| s.t_min).fold(f64::INFINITY, f64::min);
    let t_max = segments
        .iter()
        .map(|s| s.t_max)
        .fold(f64::NEG_INFINITY, f64::max);
    [t_min, t_max]
}

fn band_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*)_(mean|min|max)$").expect("valid band suffix regex"))
}

/// 散布带分类：首个带 `band` 元数据的区段优先，否则匹配 id 后缀
pub fn infer_band(group_id: &str, segments: &[Segment]) -> BandType {
    segments
        .iter()
        .find_map(|s| s.band_tag.as_deref())
        .and_then(BandType::from_tag)
        .or_else(|| {
            band_suffix_regex()
                .captures(group_id)
                .and_then(|c| BandType::from_tag(&c[2]))
        })
        .unwrap_or(BandType::None)
}

/// 拆分出基础 id 与散布带：`foo_min` → (`foo`, Min)
pub fn split_band(group_id: &str, band: BandType) -> (String, Option<BandType>) {
    if let Some(suffix) = band.suffix() {
        let base = group_id
            .strip_suffix(suffix)
            .and_then(|s| s.strip_suffix('_'))
            .unwrap_or(group_id);
        return (base.to_string(), Some(band));
    }
    match band_suffix_regex().captures(group_id) {
        Some(c) => (c[1].to_string(), BandType::from_tag(&c[2])),
        None => (group_id.to_string(), None),
    }
}
