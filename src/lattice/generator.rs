//! # 晶格生成器
//!
//! 将单胞平铺为 n×n×n 立方体以得到恰好 N 个基体原子，
//! 并推导单个单胞内的四面体/八面体间隙位点。
//!
//! ## 算法概述
//! 1. n = ⌈∛⌈N / 每胞原子数⌉⌉，保证 n³·每胞原子数 ≥ N
//! 2. 按 (x, y, z) 嵌套顺序输出每个单胞的所有基元原子
//! 3. 按输出顺序截断到前 N 个（确定性截断，末尾单胞被系统性排除）
//!
//! ## 依赖关系
//! - 被 `lattice/sampler.rs` 和 `commands/lattice.rs` 调用
//! - 使用 `models/lattice.rs` 的 Lattice, SiteScope

use crate::models::{Lattice, Position, PositionBuffer, SiteScope};

use std::collections::HashSet;

/// 去重量化精度
const DEDUP_QUANTUM: f64 = 1e-6;

/// 基体原子生成结果
#[derive(Debug, Clone)]
pub struct BaseLayout {
    /// 晶格类型
    pub lattice: Lattice,
    /// 原子位置（单胞坐标）
    pub positions: PositionBuffer,
    /// 每个轴上的单胞数
    pub cells_per_axis: usize,
    /// 每个单胞的原子数
    pub atoms_per_cell: usize,
}

impl BaseLayout {
    /// 原子总数
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// 间隙位点集合
#[derive(Debug, Clone, Default)]
pub struct InterstitialSites {
    pub tetra: PositionBuffer,
    pub octa: PositionBuffer,
}

impl InterstitialSites {
    /// 四面体在前、八面体在后的合并列表
    pub fn combined(&self) -> PositionBuffer {
        self.tetra.iter().chain(self.octa.iter()).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tetra.len() + self.octa.len()
    }
}

/// 满足 n³·atoms_per_cell ≥ target 的最小 n
pub fn cells_per_axis(atoms_per_cell: usize, target: usize) -> usize {
    if target == 0 || atoms_per_cell == 0 {
        return 0;
    }
    let cells_needed = target.div_ceil(atoms_per_cell);
    let mut n = (cells_needed as f64).cbrt().ceil() as usize;
    // 修正浮点立方根的误差
    while n * n * n < cells_needed {
        n += 1;
    }
    while n > 1 && (n - 1) * (n - 1) * (n - 1) >= cells_needed {
        n -= 1;
    }
    n
}

/// 生成恰好 `target` 个基体原子位置
pub fn generate_base_positions(lattice: Lattice, target: usize) -> BaseLayout {
    let basis = lattice.basis();
    let atoms_per_cell = basis.len();
    let n = cells_per_axis(atoms_per_cell, target);

    let mut positions = Vec::with_capacity(target);
    'tiling: for ix in 0..n {
        for iy in 0..n {
            for iz in 0..n {
                for b in basis {
                    if positions.len() == target {
                        break 'tiling;
                    }
                    positions.push([ix as f64 + b[0], iy as f64 + b[1], iz as f64 + b[2]]);
                }
            }
        }
    }

    BaseLayout {
        lattice,
        positions,
        cells_per_axis: n,
        atoms_per_cell,
    }
}

/// 推导单个单胞的间隙位点
///
/// 规范范围保留目录中的每一项（仅折叠边界坐标），全面范围在镜像后去重。
pub fn interstitial_sites(lattice: Lattice, scope: SiteScope) -> InterstitialSites {
    let derive = |catalog: PositionBuffer| match scope {
        SiteScope::Canonical => catalog.into_iter().map(fold_periodic).collect(),
        SiteScope::AllFaces => dedup(catalog.into_iter().flat_map(mirror_boundaries)),
    };

    InterstitialSites {
        tetra: derive(lattice.tetra_sites()),
        octa: derive(lattice.octa_sites()),
    }
}

/// 将坐标 1 折叠为 0（逐轴独立）
fn fold_periodic(p: Position) -> Position {
    p.map(|c| if is_boundary(c) { 0.0 } else { c })
}

/// 将边界轴上的位点复制到 0 和 1 两侧（最多 3 个边界轴的外积）
fn mirror_boundaries(p: Position) -> Vec<Position> {
    let mut images = vec![p];
    for axis in 0..3 {
        if !is_boundary(p[axis]) {
            continue;
        }
        images = images
            .into_iter()
            .flat_map(|q| {
                let mut lo = q;
                let mut hi = q;
                lo[axis] = 0.0;
                hi[axis] = 1.0;
                [lo, hi]
            })
            .collect();
    }
    images
}

fn is_boundary(c: f64) -> bool {
    c.abs() < DEDUP_QUANTUM || (c - 1.0).abs() < DEDUP_QUANTUM
}

/// 按 1e-6 量化去重，保留首次出现的顺序
pub fn dedup(points: impl IntoIterator<Item = Position>) -> PositionBuffer {
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(p.map(|c| (c / DEDUP_QUANTUM).round() as i64)))
        .collect()
}

/// 位置缓冲区的轴对齐包围盒 (min, max)
pub fn bounds(positions: &[Position]) -> Option<(Position, Position)> {
    let first = *positions.first()?;
    Some(positions.iter().fold((first, first), |(lo, hi), p| {
        (
            [lo[0].min(p[0]), lo[1].min(p[1]), lo[2].min(p[2])],
            [hi[0].max(p[0]), hi[1].max(p[1]), hi[2].max(p[2])],
        )
    }))
}
