//! # 位点采样器
//!
//! 使用可复现的 LCG 为基体原子分配替位物种 (A/B)，并放置间隙 H 原子。
//!
//! ## 采样流程
//! - 演示模式：不做替位；H 在单胞间隙位点目录中无放回抽取
//! - 晶格模式：
//!   1. Fisher–Yates 洗牌得到原子下标的随机排列
//!   2. 前 ⌊N·cFrac⌋ 个 → A，随后 ⌊N·vFrac⌋ 个（上限 N − |A|）→ B，其余 → 基体
//!   3. H：每次抽取 (位点下标, x/y/z 平铺偏移)，有放回
//!
//! 所有随机数来自同一个生成器流，调用顺序决定可复现性。
//!
//! ## 依赖关系
//! - 被 `commands/lattice.rs` 调用
//! - 使用 `lattice/generator.rs` 的 BaseLayout, interstitial_sites
//! - 使用 `utils/rng.rs` 的 Lcg, UniformSource

use crate::lattice::generator::{interstitial_sites, BaseLayout};
use crate::models::{GenerationParams, Mode, PositionBuffer, SiteScope};
use crate::utils::rng::{Lcg, UniformSource};

use serde::Serialize;
use std::collections::HashSet;

/// 采样结果：四个互不重叠的图层
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAssignment {
    /// 基体原子
    pub base: PositionBuffer,
    /// 替位物种 A
    pub species_a: PositionBuffer,
    /// 替位物种 B
    pub species_b: PositionBuffer,
    /// 间隙 H 原子
    pub interstitial: PositionBuffer,
}

impl SiteAssignment {
    /// 晶格位置总数（不含间隙原子）
    pub fn lattice_total(&self) -> usize {
        self.base.len() + self.species_a.len() + self.species_b.len()
    }
}

/// 使用参数中的种子进行分配
pub fn assign(layout: &BaseLayout, params: &GenerationParams, seed: u32) -> SiteAssignment {
    let mut rng = Lcg::new(seed);
    assign_with(layout, params, &mut rng)
}

/// 使用任意均匀随机源进行分配
pub fn assign_with<R: UniformSource>(
    layout: &BaseLayout,
    params: &GenerationParams,
    rng: &mut R,
) -> SiteAssignment {
    match params.mode {
        Mode::Demo => assign_demo(layout, params, rng),
        Mode::Lattice => assign_lattice(layout, params, rng),
    }
}

/// 替位物种数量 (|A|, |B|)
pub fn species_counts(total: usize, c_frac: f64, v_frac: f64) -> (usize, usize) {
    let a_count = ((total as f64 * c_frac).floor().max(0.0) as usize).min(total);
    let b_count = ((total as f64 * v_frac).floor().max(0.0) as usize).min(total - a_count);
    (a_count, b_count)
}

/// Fisher–Yates 洗牌得到 0..total 的随机排列
pub fn permutation<R: UniformSource>(total: usize, rng: &mut R) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..total).collect();
    for i in (1..total).rev() {
        let j = rng.next_index(i + 1);
        idx.swap(i, j);
    }
    idx
}

fn assign_demo<R: UniformSource>(
    layout: &BaseLayout,
    params: &GenerationParams,
    rng: &mut R,
) -> SiteAssignment {
    let sites = interstitial_sites(layout.lattice, params.site_scope).combined();
    let h_count = params.interstitial_count().min(sites.len());

    // 无放回：拒绝已选下标
    let mut chosen = HashSet::with_capacity(h_count);
    let mut interstitial = Vec::with_capacity(h_count);
    while interstitial.len() < h_count {
        let idx = rng.next_index(sites.len());
        if chosen.insert(idx) {
            interstitial.push(sites[idx]);
        }
    }

    SiteAssignment {
        base: layout.positions.clone(),
        interstitial,
        ..SiteAssignment::default()
    }
}

fn assign_lattice<R: UniformSource>(
    layout: &BaseLayout,
    params: &GenerationParams,
    rng: &mut R,
) -> SiteAssignment {
    let total = layout.len();
    let order = permutation(total, rng);
    let (a_count, b_count) = species_counts(total, params.c_frac, params.v_frac);

    let mut assignment = SiteAssignment {
        base: Vec::with_capacity(total - a_count - b_count),
        species_a: Vec::with_capacity(a_count),
        species_b: Vec::with_capacity(b_count),
        interstitial: Vec::new(),
    };

    for (k, &atom) in order.iter().enumerate() {
        let p = layout.positions[atom];
        if k < a_count {
            assignment.species_a.push(p);
        } else if k < a_count + b_count {
            assignment.species_b.push(p);
        } else {
            assignment.base.push(p);
        }
    }

    // 晶格模式始终使用规范目录，再平铺到整个体积
    let sites = interstitial_sites(layout.lattice, SiteScope::Canonical).combined();
    let n = layout.cells_per_axis;
    if !sites.is_empty() {
        for _ in 0..params.interstitial_count() {
            let site = sites[rng.next_index(sites.len())];
            let ox = rng.next_index(n) as f64;
            let oy = rng.next_index(n) as f64;
            let oz = rng.next_index(n) as f64;
            assignment
                .interstitial
                .push([site[0] + ox, site[1] + oy, site[2] + oz]);
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::generator::generate_base_positions;
    use crate::models::Lattice;

    fn lattice_params(fe_count: i64, c_frac: f64, v_frac: f64, h_count: i64) -> GenerationParams {
        GenerationParams {
            mode: Mode::Lattice,
            lattice: Lattice::Fcc,
            fe_count,
            c_frac,
            v_frac,
            h_count,
            ..GenerationParams::default()
        }
        .clamped()
    }

    #[test]
    fn test_partition_invariant() {
        let params = lattice_params(1234, 0.03, 0.05, 10);
        let layout = generate_base_positions(params.lattice, params.target_count());
        let result = assign(&layout, &params, params.seed);

        let total = layout.len();
        assert_eq!(result.lattice_total(), total);
        assert_eq!(result.species_a.len(), (total as f64 * 0.03).floor() as usize);
        assert_eq!(
            result.species_b.len(),
            (total - result.species_a.len()).min((total as f64 * 0.05).floor() as usize)
        );
        assert_eq!(result.interstitial.len(), 10);
    }

    #[test]
    fn test_partition_is_permutation_of_positions() {
        let params = lattice_params(500, 0.05, 0.05, 0);
        let layout = generate_base_positions(params.lattice, params.target_count());
        let result = assign(&layout, &params, 3);

        let key = |p: &[f64; 3]| p.map(|c| (c * 1e6).round() as i64);
        let mut all: Vec<_> = result
            .base
            .iter()
            .chain(&result.species_a)
            .chain(&result.species_b)
            .map(key)
            .collect();
        let mut expected: Vec<_> = layout.positions.iter().map(key).collect();
        all.sort();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let params = lattice_params(2000, 0.02, 0.01, 30);
        let layout = generate_base_positions(params.lattice, params.target_count());
        let a = assign(&layout, &params, 99);
        let b = assign(&layout, &params, 99);
        assert_eq!(a, b);

        let c = assign(&layout, &params, 100);
        assert_ne!(a, c);
    }

    #[test]
    fn test_permutation_is_bijection() {
        let mut rng = Lcg::new(5);
        let mut perm = permutation(257, &mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (0..257).collect::<Vec<_>>());
    }

    #[test]
    fn test_lattice_interstitials_inside_volume() {
        let params = lattice_params(1000, 0.0, 0.0, 30);
        let layout = generate_base_positions(params.lattice, params.target_count());
        let result = assign(&layout, &params, 11);
        let n = layout.cells_per_axis as f64;
        for p in &result.interstitial {
            assert!(p.iter().all(|&c| (0.0..n).contains(&c)), "{:?}", p);
        }
    }

    #[test]
    fn test_demo_samples_without_replacement() {
        let params = GenerationParams {
            mode: Mode::Demo,
            lattice: Lattice::Bcc,
            h_count: 12,
            site_scope: SiteScope::AllFaces,
            ..GenerationParams::default()
        }
        .clamped();
        let layout = generate_base_positions(params.lattice, params.lattice.demo_atom_count());
        let result = assign(&layout, &params, params.seed);

        assert_eq!(result.interstitial.len(), 12);
        let unique = crate::lattice::generator::dedup(result.interstitial.iter().copied());
        assert_eq!(unique.len(), 12);
        assert_eq!(result.base, layout.positions);
        assert!(result.species_a.is_empty() && result.species_b.is_empty());
    }

    #[test]
    fn test_demo_exhausts_canonical_catalog() {
        let params = GenerationParams {
            mode: Mode::Demo,
            lattice: Lattice::Bcc,
            h_count: 30,
            site_scope: SiteScope::Canonical,
            ..GenerationParams::default()
        }
        .clamped();
        let layout = generate_base_positions(params.lattice, params.lattice.demo_atom_count());
        let result = assign(&layout, &params, params.seed);

        // BCC 规范目录: 24 个四面体 + 6 个八面体，全部被抽中
        let key = |p: &[f64; 3]| p.map(|c| (c * 1e6).round() as i64);
        let mut drawn: Vec<_> = result.interstitial.iter().map(key).collect();
        let mut catalog: Vec<_> = interstitial_sites(Lattice::Bcc, SiteScope::Canonical)
            .combined()
            .iter()
            .map(key)
            .collect();
        drawn.sort();
        catalog.sort();
        assert_eq!(drawn.len(), 30);
        assert_eq!(drawn, catalog);
    }

    /// 按给定序列返回均匀数的随机源
    struct ScriptedSource {
        values: Vec<f64>,
        cursor: usize,
    }

    impl UniformSource for ScriptedSource {
        fn next_float(&mut self) -> f64 {
            let v = self.values[self.cursor];
            self.cursor += 1;
            v
        }
    }

    #[test]
    fn test_lattice_draw_order() {
        // SC, 4 个原子: n = 2, 位置 [0,0,0] [0,0,1] [0,1,0] [0,1,1]
        let layout = generate_base_positions(Lattice::Sc, 4);
        let params = GenerationParams {
            mode: Mode::Lattice,
            lattice: Lattice::Sc,
            c_frac: 0.25,
            v_frac: 0.25,
            h_count: 2,
            ..GenerationParams::default()
        };
        let mut rng = ScriptedSource {
            values: vec![
                // Fisher–Yates: i = 3, 2, 1
                0.0, 0.5, 0.9,
                // H #1: 位点下标, x, y, z 偏移
                0.0, 0.0, 0.6, 0.99,
                // H #2
                0.99, 0.5, 0.0, 0.5,
            ],
            cursor: 0,
        };
        let result = assign_with(&layout, &params, &mut rng);
        assert_eq!(rng.cursor, rng.values.len());

        // 排列 [3, 2, 1, 0]
        assert_eq!(result.species_a, vec![[0.0, 1.0, 1.0]]);
        assert_eq!(result.species_b, vec![[0.0, 1.0, 0.0]]);
        assert_eq!(result.base, vec![[0.0, 0.0, 1.0], [0.0, 0.0, 0.0]]);

        // 目录首项 [¼,½,0]；末项为折叠后的棱中点 [0,0,½]
        assert_eq!(
            result.interstitial,
            vec![[0.25, 1.5, 1.0], [1.0, 0.0, 1.5]]
        );
    }

    #[test]
    fn test_permutation_golden_seed_42() {
        let mut rng = Lcg::new(42);
        assert_eq!(permutation(8, &mut rng), vec![5, 7, 6, 4, 1, 3, 0, 2]);
    }

    #[test]
    fn test_species_counts_capped() {
        assert_eq!(species_counts(100, 0.05, 0.05), (5, 5));
        assert_eq!(species_counts(10, 0.05, 0.05), (0, 0));
        assert_eq!(species_counts(3, 1.0, 1.0), (3, 0));
    }
}
