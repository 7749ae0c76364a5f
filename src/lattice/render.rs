//! # 点精灵渲染
//!
//! 使用 `plotters` 将各图层的原子位置以实心圆绘制到 PNG/SVG。
//! 三维坐标经固定斜视投影到画布，按深度由远及近绘制。
//!
//! ## 依赖关系
//! - 被 `commands/lattice.rs` 调用
//! - 使用 `lattice/generator.rs` 的 bounds
//! - 使用 `plotters` 渲染图像

use crate::error::{HydrolabError, Result};
use crate::lattice::generator::bounds;
use crate::models::Position;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 基体原子颜色 (#888888)
pub const BASE_COLOR: RGBColor = RGBColor(0x88, 0x88, 0x88);
/// 替位物种 A 颜色 (#000000)
pub const SPECIES_A_COLOR: RGBColor = RGBColor(0x00, 0x00, 0x00);
/// 替位物种 B 颜色 (#cc0000)
pub const SPECIES_B_COLOR: RGBColor = RGBColor(0xcc, 0x00, 0x00);
/// 间隙 H 颜色 (#2266ff)
pub const HYDROGEN_COLOR: RGBColor = RGBColor(0x22, 0x66, 0xff);
/// 四面体位点标记颜色
pub const TETRA_COLOR: RGBColor = RGBColor(0x0d, 0x94, 0x88);
/// 八面体位点标记颜色
pub const OCTA_COLOR: RGBColor = RGBColor(0xd9, 0x77, 0x06);

/// 一个渲染图层
#[derive(Debug, Clone)]
pub struct PointLayer<'a> {
    pub positions: &'a [Position],
    /// 视觉半径（单胞坐标单位）
    pub radius: f64,
    pub color: RGBColor,
    /// 不透明度 [0,1]
    pub alpha: f64,
}

impl<'a> PointLayer<'a> {
    pub fn new(positions: &'a [Position], radius: f64, color: RGBColor) -> Self {
        Self {
            positions,
            radius,
            color,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

/// 固定斜视投影，视线方向与相机位置 (6, 3, 6) 一致
#[derive(Debug, Clone, Copy)]
pub struct ObliqueView {
    right: [f64; 3],
    up: [f64; 3],
    toward_camera: [f64; 3],
}

impl Default for ObliqueView {
    fn default() -> Self {
        Self::from_camera([6.0, 3.0, 6.0])
    }
}

impl ObliqueView {
    /// 由相机方向构造（看向原点，世界 y 轴朝上）
    pub fn from_camera(camera: [f64; 3]) -> Self {
        let d = normalize(camera);
        let right = normalize(cross([0.0, 1.0, 0.0], d));
        let up = cross(d, right);
        Self {
            right,
            up,
            toward_camera: d,
        }
    }

    /// 投影为 (u, v, depth)，depth 越大越靠近相机
    pub fn project(&self, p: Position) -> (f64, f64, f64) {
        (dot(p, self.right), dot(p, self.up), dot(p, self.toward_camera))
    }
}

/// 渲染点图层
///
/// `frame` 用于绘制包围盒线框（通常为基体原子）。
pub fn render_layers(
    layers: &[PointLayer],
    frame: Option<&[Position]>,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_layers(&root, layers, frame, title)?;
        root.present()
            .map_err(|e| HydrolabError::RenderError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_layers(&root, layers, frame, title)?;
        root.present()
            .map_err(|e| HydrolabError::RenderError(e.to_string()))?;
    }
    Ok(())
}

fn draw_layers<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layers: &[PointLayer],
    frame: Option<&[Position]>,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    let view = ObliqueView::default();

    // 投影所有点并记录图层下标
    let mut projected: Vec<(f64, f64, f64, usize)> = layers
        .iter()
        .enumerate()
        .flat_map(|(li, layer)| {
            layer.positions.iter().map(move |&p| {
                let (u, v, depth) = view.project(p);
                (u, v, depth, li)
            })
        })
        .collect();
    projected.sort_by(|a, b| a.2.total_cmp(&b.2));

    let (width, height) = root.dim_in_pixel();
    let margin = 20u32;
    let caption_height = 50u32;
    let area_w = width.saturating_sub(2 * margin).max(1) as f64;
    let area_h = height.saturating_sub(2 * margin + caption_height).max(1) as f64;

    let max_radius = layers.iter().map(|l| l.radius).fold(0.0_f64, f64::max);
    let ((u_min, u_max), (v_min, v_max)) = equal_aspect_ranges(
        projected.iter().map(|(u, v, _, _)| (*u, *v)),
        max_radius,
        area_w / area_h,
    );
    let scale = area_w / (u_max - u_min);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(margin)
        .build_cartesian_2d(u_min..u_max, v_min..v_max)
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    // 包围盒线框
    if let Some((lo, hi)) = frame.and_then(bounds) {
        let corners: Vec<Position> = (0..8)
            .map(|i| {
                [
                    if i & 1 == 0 { lo[0] } else { hi[0] },
                    if i & 2 == 0 { lo[1] } else { hi[1] },
                    if i & 4 == 0 { lo[2] } else { hi[2] },
                ]
            })
            .collect();
        #[rustfmt::skip]
        let edges = [
            (0, 1), (0, 2), (1, 3), (2, 3),
            (4, 5), (4, 6), (5, 7), (6, 7),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let wire = RGBColor(0x22, 0x22, 0x22).mix(0.35);
        chart
            .draw_series(edges.iter().map(|&(a, b)| {
                let (ua, va, _) = view.project(corners[a]);
                let (ub, vb, _) = view.project(corners[b]);
                PathElement::new(vec![(ua, va), (ub, vb)], wire.stroke_width(1))
            }))
            .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;
    }

    chart
        .draw_series(projected.iter().map(|&(u, v, _, li)| {
            let layer = &layers[li];
            let radius_px = ((layer.radius * scale).round() as i32).max(1);
            Circle::new((u, v), radius_px, layer.color.mix(layer.alpha).filled())
        }))
        .map_err(|e| HydrolabError::RenderError(format!("{:?}", e)))?;

    Ok(())
}

/// 计算带边距且与画布宽高比一致的投影范围
fn equal_aspect_ranges(
    points: impl Iterator<Item = (f64, f64)>,
    pad: f64,
    aspect: f64,
) -> ((f64, f64), (f64, f64)) {
    let (mut u_min, mut u_max, mut v_min, mut v_max) = points.fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(a, b, c, d), (u, v)| (a.min(u), b.max(u), c.min(v), d.max(v)),
    );
    if !u_min.is_finite() {
        (u_min, u_max, v_min, v_max) = (-1.0, 1.0, -1.0, 1.0);
    }

    let pad = pad.max(0.1) * 1.5;
    let (u_c, v_c) = ((u_min + u_max) / 2.0, (v_min + v_max) / 2.0);
    let mut half_u = (u_max - u_min) / 2.0 + pad;
    let mut half_v = (v_max - v_min) / 2.0 + pad;

    if half_u / half_v < aspect {
        half_u = half_v * aspect;
    } else {
        half_v = half_u / aspect;
    }

    ((u_c - half_u, u_c + half_u), (v_c - half_v, v_c + half_v))
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(a: [f64; 3]) -> [f64; 3] {
    let len = dot(a, a).sqrt();
    if len < 1e-12 {
        return [0.0, 0.0, 1.0];
    }
    [a[0] / len, a[1] / len, a[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_orthonormal() {
        let view = ObliqueView::default();
        assert!(dot(view.right, view.up).abs() < 1e-12);
        assert!(dot(view.right, view.toward_camera).abs() < 1e-12);
        assert!((dot(view.up, view.up) - 1.0).abs() < 1e-12);
        // 世界 y 轴在画面中朝上
        assert!(view.up[1] > 0.0);
    }

    #[test]
    fn test_depth_grows_toward_camera() {
        let view = ObliqueView::default();
        let (_, _, near) = view.project([1.0, 1.0, 1.0]);
        let (_, _, far) = view.project([0.0, 0.0, 0.0]);
        assert!(near > far);
    }

    #[test]
    fn test_equal_aspect_ranges() {
        let pts = vec![(0.0, 0.0), (4.0, 1.0)];
        let ((u0, u1), (v0, v1)) = equal_aspect_ranges(pts.into_iter(), 0.5, 2.0);
        assert!(((u1 - u0) / (v1 - v0) - 2.0).abs() < 1e-9);
        assert!(u0 < 0.0 && u1 > 4.0);
    }
}
