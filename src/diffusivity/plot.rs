//! # 扩散系数图表生成
//!
//! 使用 `plotters` 将采样序列绘制为对数纵轴曲线图。
//!
//! ## 功能
//! - 线性温度横轴（K 或 °C），log10 扩散系数纵轴
//! - min/max 散布带包络填充（15% 透明度）
//! - 可选曲线末端编号，编号图例
//! - 支持 PNG 和 SVG 输出
//!
//! 纵轴在 (T, log10 D) 线性坐标上绘制，刻度标签按指数形式格式化。
//! 刻度位置固定：横轴 5 等分（6 个标签），纵轴 max(2, round(Δlog)) 等分。
//!
//! ## 依赖关系
//! - 被 `commands/diffusivity/` 调用
//! - 使用 `diffusivity/sampler.rs` 的 Series, Envelope
//! - 使用 `plotters` 渲染图表

use crate::diffusivity::export::format_exponential;
use crate::diffusivity::sampler::{Envelope, Series, TemperatureUnit};
use crate::error::{HydrolabError, Result};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 横轴刻度等分数
pub const X_TICK_INTERVALS: usize = 5;

/// 包络填充透明度
pub const ENVELOPE_ALPHA: f64 = 0.15;

/// 图表外观选项
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub unit: TemperatureUnit,
    /// 曲线末端绘制编号
    pub numbering: bool,
    pub use_svg: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Hydrogen diffusivity".to_string(),
            width: 1200,
            height: 800,
            unit: TemperatureUnit::Kelvin,
            numbering: false,
            use_svg: false,
        }
    }
}

/// 坐标框架：轴范围与刻度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub x_min: f64,
    pub x_max: f64,
    pub log_min: f64,
    pub log_max: f64,
    /// 纵轴刻度步数
    pub y_steps: usize,
}

impl ChartFrame {
    /// 由序列与包络计算框架；无有效采样点时返回 `None`
    pub fn compute(series: &[Series], envelopes: &[Envelope], unit: TemperatureUnit) -> Option<Self> {
        let temperatures = series
            .iter()
            .flat_map(|s| s.samples.iter().map(|p| p.temperature_k));
        let (mut x_min, mut x_max) = bounds(temperatures.map(|t| unit.to_axis(t)))?;

        let diffusivities = series
            .iter()
            .flat_map(|s| s.samples.iter().map(|p| p.diffusivity))
            .chain(
                envelopes
                    .iter()
                    .flat_map(|e| e.points.iter().flat_map(|p| [p.min, p.max])),
            )
            .filter(|d| *d > 0.0 && d.is_finite());
        let (d_min, d_max) = bounds(diffusivities)?;
        let (mut log_min, mut log_max) = (d_min.log10(), d_max.log10());

        if x_max - x_min < 1e-9 {
            x_min -= 1.0;
            x_max += 1.0;
        }
        if log_max - log_min < 1e-9 {
            log_min -= 0.5;
            log_max += 0.5;
        }

        let y_steps = ((log_max - log_min).round() as usize).max(2);

        Some(Self {
            x_min,
            x_max,
            log_min,
            log_max,
            y_steps,
        })
    }

    /// 横轴刻度：`x_min + k·(x_max − x_min)/5`
    pub fn x_ticks(&self) -> Vec<f64> {
        even_ticks(self.x_min, self.x_max, X_TICK_INTERVALS)
    }

    /// 纵轴刻度（log10）：`log_min + k·Δ/y_steps`
    pub fn y_ticks(&self) -> Vec<f64> {
        even_ticks(self.log_min, self.log_max, self.y_steps)
    }
}

/// [min, max] 的 steps 等分点，末点精确等于 max
fn even_ticks(min: f64, max: f64, steps: usize) -> Vec<f64> {
    (0..=steps)
        .map(|k| {
            if k == steps {
                max
            } else {
                min + (max - min) * k as f64 / steps as f64
            }
        })
        .collect()
}

/// 图例编号：只为有采样点的序列连续编号
pub fn legend_numbers(series: &[Series]) -> Vec<Option<usize>> {
    let mut next = 0;
    series
        .iter()
        .map(|s| {
            if s.samples.is_empty() {
                None
            } else {
                next += 1;
                Some(next)
            }
        })
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// 解析 `#rrggbb` 颜色，无效输入回退为黑色
pub fn hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => BLACK,
    }
}

/// 纵轴刻度标签：log10 值 → 1 位小数的指数形式
pub fn format_exponent(log_value: f64) -> String {
    format_exponential(10f64.powf(log_value), 1)
}

/// 生成扩散系数图表
///
/// 无有效采样点时返回 `Ok(false)` 且不写文件。
pub fn generate_diffusivity_plot(
    series: &[Series],
    envelopes: &[Envelope],
    output_path: &Path,
    options: &ChartOptions,
) -> Result<bool> {
    let Some(frame) = ChartFrame::compute(series, envelopes, options.unit) else {
        return Ok(false);
    };

    let size = (options.width, options.height);
    if options.use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_chart(&root, series, envelopes, &frame, options)?;
        root.present()
            .map_err(|e| HydrolabError::RenderError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_chart(&root, series, envelopes, &frame, options)?;
        root.present()
            .map_err(|e| HydrolabError::RenderError(e.to_string()))?;
    }
    Ok(true)
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[Series],
    envelopes: &[Envelope],
    frame: &ChartFrame,
    options: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    let unit = options.unit;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (frame.x_min..frame.x_max).with_key_points(frame.x_ticks()),
            (frame.log_min..frame.log_max).with_key_points(frame.y_ticks()),
        )
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format_exponent(*y))
        .x_desc(format!("Temperature ({})", unit.symbol()))
        .y_desc("D (mm²/s)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    // 包络先绘制，位于曲线下方
    for envelope in envelopes {
        let upper = envelope
            .points
            .iter()
            .map(|p| (unit.to_axis(p.temperature_k), p.max.log10()));
        let lower = envelope
            .points
            .iter()
            .rev()
            .map(|p| (unit.to_axis(p.temperature_k), p.min.log10()));
        let outline: Vec<(f64, f64)> = upper.chain(lower).collect();
        let fill = hex_color(envelope.color).mix(ENVELOPE_ALPHA);

        chart
            .draw_series(std::iter::once(Polygon::new(outline, fill.filled())))
            .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;
    }

    for (s, number) in series.iter().zip(legend_numbers(series)) {
        let Some(number) = number else {
            continue;
        };
        let color = hex_color(s.color);
        let points: Vec<(f64, f64)> = s
            .samples
            .iter()
            .map(|p| (unit.to_axis(p.temperature_k), p.diffusivity.log10()))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?
            .label(format!("{}. {}", number, s.label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        if options.numbering {
            if let Some(&(x, y)) = points.last() {
                chart
                    .draw_series(std::iter::once(Text::new(
                        number.to_string(),
                        (x, y),
                        ("sans-serif", 14).into_font().color(&color),
                    )))
                    .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    Ok(())
}
