//! # 晶格数据模型
//!
//! 定义立方晶格类型 (SC/BCC/FCC) 的分数坐标表、间隙位点目录，
//! 以及晶格生成参数 `GenerationParams`。
//!
//! 所有坐标均为单胞坐标（以晶格常数 a 为单位），不含物理单位。
//!
//! ## 依赖关系
//! - 被 `lattice/` 和 `commands/lattice.rs` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 单个位置 (x, y, z)
pub type Position = [f64; 3];

/// 位置缓冲区：生成后不再修改
pub type PositionBuffer = Vec<Position>;

/// 立方晶格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lattice {
    Sc,
    Bcc,
    Fcc,
}

impl std::fmt::Display for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lattice::Sc => write!(f, "SC"),
            Lattice::Bcc => write!(f, "BCC"),
            Lattice::Fcc => write!(f, "FCC"),
        }
    }
}

impl Lattice {
    pub const ALL: [Lattice; 3] = [Lattice::Sc, Lattice::Bcc, Lattice::Fcc];

    /// 基元原子的分数坐标
    pub fn basis(&self) -> &'static [Position] {
        match self {
            Lattice::Sc => &[[0.0, 0.0, 0.0]],
            Lattice::Bcc => &[[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
            Lattice::Fcc => &[
                [0.0, 0.0, 0.0],
                [0.0, 0.5, 0.5],
                [0.5, 0.0, 0.5],
                [0.5, 0.5, 0.0],
            ],
        }
    }

    /// 每个单胞的原子数
    pub fn atoms_per_cell(&self) -> usize {
        self.basis().len()
    }

    /// 演示模式下显示的原子数（含角顶镜像）
    pub fn demo_atom_count(&self) -> usize {
        match self {
            Lattice::Sc => 8,
            Lattice::Bcc => 9,
            Lattice::Fcc => 14,
        }
    }

    /// 金属半径（以晶格常数 a 为单位）
    ///
    /// - SC: 沿棱相切，2r = a
    /// - BCC: 沿体对角线相切，4r = √3 a
    /// - FCC: 沿面对角线相切，4r = √2 a
    pub fn base_atomic_radius(&self) -> f64 {
        match self {
            Lattice::Sc => 0.5,
            Lattice::Bcc => 3.0_f64.sqrt() / 4.0,
            Lattice::Fcc => 2.0_f64.sqrt() / 4.0,
        }
    }

    /// 四面体间隙位点目录
    ///
    /// SC/BCC 使用 ({¼,¾}, {½}, {0,1}) 的六种轴排列；FCC 为 {¼,¾}³ 的 8 个位点。
    pub fn tetra_sites(&self) -> PositionBuffer {
        let mut sites = Vec::new();
        match self {
            Lattice::Sc | Lattice::Bcc => {
                let q: &[f64] = &[0.25, 0.75];
                let m: &[f64] = &[0.5];
                let z: &[f64] = &[0.0, 1.0];
                let patterns: [[&[f64]; 3]; 6] = [
                    [q, m, z],
                    [m, q, z],
                    [q, z, m],
                    [m, z, q],
                    [z, q, m],
                    [z, m, q],
                ];
                for [xs, ys, zs] in patterns {
                    for &x in xs {
                        for &y in ys {
                            for &z0 in zs {
                                push_unique(&mut sites, [x, y, z0]);
                            }
                        }
                    }
                }
            }
            Lattice::Fcc => {
                for x in [0.25, 0.75] {
                    for y in [0.25, 0.75] {
                        for z in [0.25, 0.75] {
                            sites.push([x, y, z]);
                        }
                    }
                }
            }
        }
        sites
    }

    /// 八面体间隙位点目录
    ///
    /// SC/FCC: 体心 + 12 个棱中点；BCC: 6 个面心。
    pub fn octa_sites(&self) -> PositionBuffer {
        let mut sites = Vec::new();
        match self {
            Lattice::Sc | Lattice::Fcc => {
                push_unique(&mut sites, [0.5, 0.5, 0.5]);
                for axis in 0..3 {
                    for u in [0.0, 1.0] {
                        for v in [0.0, 1.0] {
                            let mut p = [0.0; 3];
                            p[axis] = 0.5;
                            p[(axis + 1) % 3] = u;
                            p[(axis + 2) % 3] = v;
                            push_unique(&mut sites, p);
                        }
                    }
                }
            }
            Lattice::Bcc => {
                for p in [
                    [0.5, 0.5, 0.0],
                    [0.5, 0.5, 1.0],
                    [0.5, 0.0, 0.5],
                    [0.5, 1.0, 0.5],
                    [0.0, 0.5, 0.5],
                    [1.0, 0.5, 0.5],
                ] {
                    push_unique(&mut sites, p);
                }
            }
        }
        sites
    }
}

fn push_unique(sites: &mut PositionBuffer, p: Position) {
    if !sites.contains(&p) {
        sites.push(p);
    }
}

/// 显示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 单胞演示：显示间隙位点，H 在单胞内采样
    Demo,
    /// 完整晶格：N 个基体原子 + 替位/间隙原子
    Lattice,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Demo => write!(f, "demo"),
            Mode::Lattice => write!(f, "lattice"),
        }
    }
}

/// 间隙位点范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiteScope {
    /// 固定目录，周期边界代表点折叠到 [0,1)
    Canonical,
    /// 边界上的位点镜像到单胞的所有面
    AllFaces,
}

impl std::fmt::Display for SiteScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteScope::Canonical => write!(f, "canonical"),
            SiteScope::AllFaces => write!(f, "allFaces"),
        }
    }
}

/// 晶格生成参数
///
/// UI 层持有唯一可变副本，经 [`GenerationParams::clamped`] 后传入纯函数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub mode: Mode,
    pub lattice: Lattice,
    /// 基体原子数 [100, 1e6]
    pub fe_count: i64,
    /// 基体原子尺寸系数 [0.01, 1]
    pub fe_size: f64,
    /// 替位原子 A 的比例 [0, 0.05]
    pub c_frac: f64,
    /// A 的相对尺寸 [0.01, 5]
    pub c_size: f64,
    /// 替位原子 B 的比例 [0, 0.05]
    pub v_frac: f64,
    /// B 的相对尺寸 [0.01, 5]
    pub v_size: f64,
    /// 间隙 H 原子数 [0, 30]
    pub h_count: i64,
    /// H 的相对尺寸 [0.01, 1]
    pub h_size: f64,
    /// 演示模式下间隙位点标记尺寸 [0.01, 1]
    pub site_size: f64,
    pub site_scope: SiteScope,
    pub seed: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            mode: Mode::Demo,
            lattice: Lattice::Bcc,
            fe_count: 100,
            fe_size: 0.6,
            c_frac: 0.0,
            c_size: 1.0,
            v_frac: 0.0,
            v_size: 1.0,
            h_count: 0,
            h_size: 0.5,
            site_size: 0.4,
            site_scope: SiteScope::AllFaces,
            seed: 42,
        }
    }
}

impl GenerationParams {
    pub const FE_COUNT_RANGE: (i64, i64) = (100, 1_000_000);
    pub const FRACTION_RANGE: (f64, f64) = (0.0, 0.05);
    pub const SPECIES_SIZE_RANGE: (f64, f64) = (0.01, 5.0);
    pub const SIZE_RANGE: (f64, f64) = (0.01, 1.0);
    pub const H_COUNT_RANGE: (i64, i64) = (0, 30);

    /// 将所有数值字段限制到文档范围内（不拒绝，只截断）
    pub fn clamped(&self) -> Self {
        GenerationParams {
            fe_count: self
                .fe_count
                .clamp(Self::FE_COUNT_RANGE.0, Self::FE_COUNT_RANGE.1),
            fe_size: clamp_f64(self.fe_size, Self::SIZE_RANGE),
            c_frac: clamp_f64(self.c_frac, Self::FRACTION_RANGE),
            c_size: clamp_f64(self.c_size, Self::SPECIES_SIZE_RANGE),
            v_frac: clamp_f64(self.v_frac, Self::FRACTION_RANGE),
            v_size: clamp_f64(self.v_size, Self::SPECIES_SIZE_RANGE),
            h_count: self
                .h_count
                .clamp(Self::H_COUNT_RANGE.0, Self::H_COUNT_RANGE.1),
            h_size: clamp_f64(self.h_size, Self::SIZE_RANGE),
            site_size: clamp_f64(self.site_size, Self::SIZE_RANGE),
            ..self.clone()
        }
    }

    /// 基体原子目标数（已截断时非负）
    pub fn target_count(&self) -> usize {
        self.fe_count.max(0) as usize
    }

    /// 间隙原子数（已截断时非负）
    pub fn interstitial_count(&self) -> usize {
        self.h_count.max(0) as usize
    }
}

/// 非有限值截断到下界
fn clamp_f64(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_sizes() {
        assert_eq!(Lattice::Sc.atoms_per_cell(), 1);
        assert_eq!(Lattice::Bcc.atoms_per_cell(), 2);
        assert_eq!(Lattice::Fcc.atoms_per_cell(), 4);
    }

    #[test]
    fn test_catalog_coordinates_in_unit_cube() {
        for lattice in Lattice::ALL {
            let all = lattice
                .basis()
                .iter()
                .copied()
                .chain(lattice.tetra_sites())
                .chain(lattice.octa_sites());
            for p in all {
                assert!(p.iter().all(|c| (0.0..=1.0).contains(c)), "{:?}", p);
            }
        }
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(Lattice::Sc.tetra_sites().len(), 24);
        assert_eq!(Lattice::Bcc.tetra_sites().len(), 24);
        assert_eq!(Lattice::Fcc.tetra_sites().len(), 8);
        assert_eq!(Lattice::Sc.octa_sites().len(), 13);
        assert_eq!(Lattice::Fcc.octa_sites().len(), 13);
        assert_eq!(Lattice::Bcc.octa_sites().len(), 6);
    }

    #[test]
    fn test_radius_touching_conditions() {
        assert!((Lattice::Bcc.base_atomic_radius() * 4.0 - 3.0_f64.sqrt()).abs() < 1e-12);
        assert!((Lattice::Fcc.base_atomic_radius() * 4.0 - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_params() {
        let params = GenerationParams {
            fe_count: 5,
            c_frac: 0.5,
            v_frac: -1.0,
            c_size: 10.0,
            h_count: 99,
            h_size: f64::NAN,
            ..GenerationParams::default()
        }
        .clamped();

        assert_eq!(params.fe_count, 100);
        assert_eq!(params.c_frac, 0.05);
        assert_eq!(params.v_frac, 0.0);
        assert_eq!(params.c_size, 5.0);
        assert_eq!(params.h_count, 30);
        assert_eq!(params.h_size, 0.01);
    }

    #[test]
    fn test_clamp_keeps_in_range_values() {
        let params = GenerationParams::default();
        assert_eq!(params.clamped(), params);
    }
}
