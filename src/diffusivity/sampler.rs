//! # 曲线采样与散布带包络
//!
//! 将分组描述符转换为按温度排序的采样点序列。
//!
//! ## 功能
//! - 每个区段等间距采样 60 点，非首区段跳过共享边界点
//! - 可选全局温度截断 [clamp_min, clamp_max]
//! - min/max 散布带重叠区间内 180 点包络
//! - 选中分组 → 带颜色的绘图序列
//!
//! 所有函数均为纯函数，每次调用重新计算。
//!
//! ## 依赖关系
//! - 被 `diffusivity/plot.rs`, `diffusivity/export.rs` 和 `commands/diffusivity/` 使用
//! - 使用 `diffusivity/model.rs` 求值
//! - 使用 `diffusivity/dataset.rs` 的 split_band

use crate::diffusivity::dataset::split_band;
use crate::diffusivity::model::{evaluate, CELSIUS_OFFSET};
use crate::models::{BandType, GroupDescriptor, Sample};

use std::collections::BTreeMap;

/// 每个区段的采样点数
pub const SAMPLES_PER_SEGMENT: usize = 60;

/// 包络采样点数
pub const FILL_SAMPLES: usize = 180;

/// 序列调色板，按选择顺序循环使用
pub const PALETTE: [&str; 8] = [
    "#111827", "#dc2626", "#0d9488", "#2563eb", "#d97706", "#6d28d9", "#059669", "#ea580c",
];

/// 温度轴单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Kelvin,
    Celsius,
}

impl TemperatureUnit {
    /// 开尔文温度 → 轴坐标
    pub fn to_axis(&self, temperature_k: f64) -> f64 {
        match self {
            TemperatureUnit::Kelvin => temperature_k,
            TemperatureUnit::Celsius => temperature_k - CELSIUS_OFFSET,
        }
    }

    /// 轴坐标 → 开尔文温度
    pub fn to_kelvin(&self, axis: f64) -> f64 {
        match self {
            TemperatureUnit::Kelvin => axis,
            TemperatureUnit::Celsius => axis + CELSIUS_OFFSET,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 包络上的一点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    pub temperature_k: f64,
    pub min: f64,
    pub max: f64,
}

/// 一条 min/max 散布带包络
#[derive(Debug, Clone)]
pub struct Envelope {
    pub base_id: String,
    pub color: &'static str,
    pub points: Vec<EnvelopePoint>,
}

/// 一条绘图序列
#[derive(Debug, Clone)]
pub struct Series {
    pub group_id: String,
    pub label: String,
    pub color: &'static str,
    pub band: BandType,
    pub base_id: String,
    pub samples: Vec<Sample>,
}

impl Series {
    /// 扩散系数范围 (min, max)
    pub fn diffusivity_range(&self) -> Option<(f64, f64)> {
        min_max(self.samples.iter().map(|s| s.diffusivity))
    }

    /// 温度范围 (K)
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        min_max(self.samples.iter().map(|s| s.temperature_k))
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// 在 [lo, hi] 上等间距取 `count` 个温度，两端点精确包含
fn linspace(lo: f64, hi: f64, count: usize) -> impl Iterator<Item = f64> {
    let steps = count.saturating_sub(1).max(1) as f64;
    (0..count).map(move |i| {
        if i + 1 == count {
            hi
        } else {
            lo + (hi - lo) * (i as f64 / steps)
        }
    })
}

/// 对分组采样
///
/// 区段范围先与可选的全局截断求交，空或倒置的区段被跳过。
/// 除首个区段外，每个区段的第一个采样点（共享边界）被跳过。
/// 求值为空或非正的点被丢弃。
pub fn sample_group(
    descriptor: &GroupDescriptor,
    clamp_min: Option<f64>,
    clamp_max: Option<f64>,
) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(descriptor.segments.len() * SAMPLES_PER_SEGMENT);

    for (index, segment) in descriptor.segments.iter().enumerate() {
        let lo = clamp_min.map_or(segment.t_min, |c| segment.t_min.max(c));
        let hi = clamp_max.map_or(segment.t_max, |c| segment.t_max.min(c));
        if !(hi > lo) {
            continue;
        }

        let skip = usize::from(index > 0);
        for temperature_k in linspace(lo, hi, SAMPLES_PER_SEGMENT).skip(skip) {
            if let Some(diffusivity) = evaluate(&segment.model, temperature_k) {
                samples.push(Sample {
                    temperature_k,
                    diffusivity,
                });
            }
        }
    }

    samples
}

/// 在温度 T 下对描述符求值：线性扫描首个包含 T 的区段
pub fn evaluate_descriptor(descriptor: &GroupDescriptor, temperature_k: f64) -> Option<f64> {
    descriptor
        .segments
        .iter()
        .find(|s| s.contains(temperature_k))
        .and_then(|s| evaluate(&s.model, temperature_k))
}

/// 计算 min/max 两个描述符的重叠包络
///
/// 重叠区间为 [两者首段 Tmin 的较大值, 两者末段 Tmax 的较小值]，为空时返回空序列。
/// 只保留两侧求值均有效的点。
pub fn compute_overlap(min: &GroupDescriptor, max: &GroupDescriptor) -> Vec<EnvelopePoint> {
    let (Some(min_first), Some(max_first), Some(min_last), Some(max_last)) = (
        min.segments.first(),
        max.segments.first(),
        min.segments.last(),
        max.segments.last(),
    ) else {
        return Vec::new();
    };

    let lo = min_first.t_min.max(max_first.t_min);
    let hi = min_last.t_max.min(max_last.t_max);
    if !(hi > lo) {
        return Vec::new();
    }

    linspace(lo, hi, FILL_SAMPLES)
        .filter_map(|temperature_k| {
            let lower = evaluate_descriptor(min, temperature_k)?;
            let upper = evaluate_descriptor(max, temperature_k)?;
            Some(EnvelopePoint {
                temperature_k,
                min: lower,
                max: upper,
            })
        })
        .collect()
}

/// 选中分组 → 绘图序列，颜色按选择顺序分配
pub fn prepare_series(
    groups: &[&GroupDescriptor],
    clamp_min: Option<f64>,
    clamp_max: Option<f64>,
) -> Vec<Series> {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let (base_id, band) = split_band(&group.id, group.band);
            Series {
                group_id: group.id.clone(),
                label: group.label.clone(),
                color: PALETTE[index % PALETTE.len()],
                band: band.unwrap_or(BandType::None),
                base_id,
                samples: sample_group(group, clamp_min, clamp_max),
            }
        })
        .collect()
}

/// 收集选中分组中成对出现的 min/max 散布带包络
///
/// 包络颜色取 min 序列的颜色；截断窗口外的点被移除，重叠为空的配对被忽略。
pub fn collect_envelopes(
    groups: &[&GroupDescriptor],
    clamp_min: Option<f64>,
    clamp_max: Option<f64>,
) -> Vec<Envelope> {
    type Pair<'a> = (Option<(usize, &'a GroupDescriptor)>, Option<(usize, &'a GroupDescriptor)>);
    let mut pairs: BTreeMap<String, Pair> = BTreeMap::new();

    for (index, group) in groups.iter().enumerate() {
        let (base_id, band) = split_band(&group.id, group.band);
        let entry = pairs.entry(base_id).or_default();
        match band {
            Some(BandType::Min) if entry.0.is_none() => entry.0 = Some((index, *group)),
            Some(BandType::Max) if entry.1.is_none() => entry.1 = Some((index, *group)),
            _ => {}
        }
    }

    pairs
        .into_iter()
        .filter_map(|(base_id, pair)| {
            let (Some((index, min)), Some((_, max))) = pair else {
                return None;
            };
            let points: Vec<EnvelopePoint> = compute_overlap(min, max)
                .into_iter()
                .filter(|p| {
                    clamp_min.map_or(true, |c| p.temperature_k >= c)
                        && clamp_max.map_or(true, |c| p.temperature_k <= c)
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            Some(Envelope {
                base_id,
                color: PALETTE[index % PALETTE.len()],
                points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Model, Segment};

    fn segment(t_min: f64, t_max: f64, model: Model) -> Segment {
        Segment {
            entry_id: format!("{}-{}", t_min, t_max),
            model,
            t_min,
            t_max,
            material: None,
            band_tag: None,
            conditions: None,
            reported_as: None,
        }
    }

    fn group(id: &str, band: BandType, segments: Vec<Segment>) -> GroupDescriptor {
        let range = [
            segments.first().map_or(0.0, |s| s.t_min),
            segments.last().map_or(0.0, |s| s.t_max),
        ];
        GroupDescriptor {
            id: id.to_string(),
            label: id.to_string(),
            source_id: None,
            source_title: "test".to_string(),
            temperature_range: range,
            segments,
            band,
            material_label: None,
        }
    }

    fn arrhenius(d0: f64) -> Model {
        Model::Arrhenius {
            d0,
            q: 40_000.0,
            r: None,
        }
    }

    #[test]
    fn test_single_segment_spans_range() {
        let g = group("a", BandType::None, vec![segment(300.0, 400.0, arrhenius(1.0))]);
        let samples = sample_group(&g, None, None);

        assert_eq!(samples.len(), SAMPLES_PER_SEGMENT);
        assert_eq!(samples.first().unwrap().temperature_k, 300.0);
        assert_eq!(samples.last().unwrap().temperature_k, 400.0);
        assert!(samples
            .windows(2)
            .all(|w| w[1].temperature_k > w[0].temperature_k));
        assert!(samples.iter().all(|s| s.diffusivity > 0.0));
    }

    #[test]
    fn test_shared_boundary_skipped() {
        let g = group(
            "a",
            BandType::None,
            vec![
                segment(300.0, 400.0, arrhenius(1.0)),
                segment(400.0, 500.0, arrhenius(2.0)),
            ],
        );
        let samples = sample_group(&g, None, None);

        assert_eq!(samples.len(), 2 * SAMPLES_PER_SEGMENT - 1);
        let at_boundary = samples.iter().filter(|s| s.temperature_k == 400.0).count();
        assert_eq!(at_boundary, 1);
    }

    #[test]
    fn test_clamp_and_inverted_ranges() {
        let g = group(
            "a",
            BandType::None,
            vec![
                segment(300.0, 400.0, arrhenius(1.0)),
                segment(400.0, 500.0, arrhenius(1.0)),
            ],
        );
        let samples = sample_group(&g, Some(420.0), Some(480.0));
        let first = samples.first().unwrap().temperature_k;
        assert!((first - (420.0 + 60.0 / 59.0)).abs() < 1e-9);
        assert_eq!(samples.last().unwrap().temperature_k, 480.0);

        assert!(sample_group(&g, Some(600.0), None).is_empty());
        assert!(sample_group(&g, Some(450.0), Some(350.0)).is_empty());
    }

    #[test]
    fn test_invalid_values_dropped() {
        let model = Model::Power {
            a: 1.0,
            n: 0.5,
            input: Some("theta_C".to_string()),
        };
        // 273.15 K 以下为负摄氏温度，分数次幂无效
        let g = group("a", BandType::None, vec![segment(200.0, 400.0, model)]);
        let samples = sample_group(&g, None, None);
        assert!(!samples.is_empty());
        assert!(samples.len() < SAMPLES_PER_SEGMENT);
        assert!(samples.iter().all(|s| s.temperature_k > CELSIUS_OFFSET));
    }

    #[test]
    fn test_restartable() {
        let g = group("a", BandType::None, vec![segment(300.0, 400.0, arrhenius(1.0))]);
        assert_eq!(sample_group(&g, None, None), sample_group(&g, None, None));
    }

    #[test]
    fn test_evaluate_descriptor_first_match() {
        let g = group(
            "a",
            BandType::None,
            vec![
                segment(300.0, 400.0, Model::SinglePoint { diffusivity: 1.0 }),
                segment(400.0, 500.0, Model::SinglePoint { diffusivity: 2.0 }),
            ],
        );
        assert_eq!(evaluate_descriptor(&g, 400.0), Some(1.0));
        assert_eq!(evaluate_descriptor(&g, 450.0), Some(2.0));
        assert_eq!(evaluate_descriptor(&g, 550.0), None);
    }

    #[test]
    fn test_disjoint_overlap_is_empty() {
        let min = group("s_min", BandType::Min, vec![segment(300.0, 400.0, arrhenius(1.0))]);
        let max = group("s_max", BandType::Max, vec![segment(500.0, 600.0, arrhenius(2.0))]);
        assert!(compute_overlap(&min, &max).is_empty());
    }

    #[test]
    fn test_overlap_domain() {
        let min = group("s_min", BandType::Min, vec![segment(300.0, 500.0, arrhenius(1.0))]);
        let max = group("s_max", BandType::Max, vec![segment(350.0, 600.0, arrhenius(2.0))]);
        let points = compute_overlap(&min, &max);

        assert_eq!(points.len(), FILL_SAMPLES);
        assert_eq!(points.first().unwrap().temperature_k, 350.0);
        assert_eq!(points.last().unwrap().temperature_k, 500.0);
        assert!(points.iter().all(|p| p.max > p.min));
    }

    #[test]
    fn test_series_and_envelopes() {
        let min = group("s_min", BandType::Min, vec![segment(300.0, 500.0, arrhenius(1.0))]);
        let max = group("s_max", BandType::Max, vec![segment(300.0, 500.0, arrhenius(2.0))]);
        let lone = group("t_min", BandType::Min, vec![segment(300.0, 500.0, arrhenius(1.0))]);
        let selected = vec![&lone, &min, &max];

        let series = prepare_series(&selected, None, None);
        assert_eq!(series[0].color, PALETTE[0]);
        assert_eq!(series[1].base_id, "s");
        assert_eq!(series[2].band, BandType::Max);

        let envelopes = collect_envelopes(&selected, None, None);
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].base_id, "s");
        assert_eq!(envelopes[0].color, PALETTE[1]);
    }

    #[test]
    fn test_envelope_respects_clamp() {
        let min = group("s_min", BandType::Min, vec![segment(300.0, 600.0, arrhenius(1.0))]);
        let max = group("s_max", BandType::Max, vec![segment(300.0, 600.0, arrhenius(2.0))]);
        let envelopes = collect_envelopes(&[&min, &max], Some(350.0), Some(450.0));

        assert_eq!(envelopes.len(), 1);
        assert!(envelopes[0]
            .points
            .iter()
            .all(|p| p.temperature_k >= 350.0 && p.temperature_k <= 450.0));
        assert!(collect_envelopes(&[&min, &max], Some(700.0), None).is_empty());
    }

    #[test]
    fn test_temperature_unit() {
        assert_eq!(TemperatureUnit::Kelvin.to_axis(300.0), 300.0);
        assert!((TemperatureUnit::Celsius.to_axis(373.15) - 100.0).abs() < 1e-9);
        assert!((TemperatureUnit::Celsius.to_kelvin(100.0) - 373.15).abs() < 1e-9);
    }
}
