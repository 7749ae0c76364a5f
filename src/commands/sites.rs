//! # sites 子命令实现
//!
//! 打印每种晶格在给定范围下的四面体/八面体间隙位点数量，可选列出全部坐标。
//!
//! ## 依赖关系
//! - 使用 `cli/lattice.rs` 定义的 SitesArgs
//! - 使用 `lattice/generator.rs` 的 interstitial_sites
//! - 使用 `tabled` 输出表格

use crate::cli::lattice::SitesArgs;
use crate::error::Result;
use crate::lattice::interstitial_sites;
use crate::models::{Lattice, Position, SiteScope};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 位点数量汇总行
#[derive(Debug, Clone, Tabled)]
struct SiteCountRow {
    #[tabled(rename = "Lattice")]
    lattice: String,
    #[tabled(rename = "Atoms/cell")]
    atoms_per_cell: usize,
    #[tabled(rename = "Tetrahedral")]
    tetra: usize,
    #[tabled(rename = "Octahedral")]
    octa: usize,
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "r0 (a)")]
    radius: String,
}

/// 位点坐标行
#[derive(Debug, Clone, Tabled)]
struct SiteRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "y")]
    y: String,
    #[tabled(rename = "z")]
    z: String,
}

/// 执行位点列表
pub fn execute(args: SitesArgs) -> Result<()> {
    let scope: SiteScope = args.site_scope.into();
    output::print_header(&format!("Interstitial Sites ({})", scope));

    let lattices: Vec<Lattice> = match args.lattice {
        Some(kind) => vec![kind.into()],
        None => Lattice::ALL.to_vec(),
    };

    let rows: Vec<SiteCountRow> = lattices.iter().map(|&l| count_row(l, scope)).collect();
    println!("{}", Table::new(&rows));

    if args.coords {
        for &lattice in &lattices {
            let sites = interstitial_sites(lattice, scope);
            let rows = coordinate_rows(&sites.tetra, &sites.octa);
            output::print_header(&format!("{} sites", lattice));
            println!("{}", Table::new(&rows));
        }
    }

    Ok(())
}

fn count_row(lattice: Lattice, scope: SiteScope) -> SiteCountRow {
    let sites = interstitial_sites(lattice, scope);
    SiteCountRow {
        lattice: lattice.to_string(),
        atoms_per_cell: lattice.atoms_per_cell(),
        tetra: sites.tetra.len(),
        octa: sites.octa.len(),
        total: sites.len(),
        radius: format!("{:.4}", lattice.base_atomic_radius()),
    }
}

fn coordinate_rows(tetra: &[Position], octa: &[Position]) -> Vec<SiteRow> {
    let typed = tetra
        .iter()
        .map(|p| ("tetra", p))
        .chain(octa.iter().map(|p| ("octa", p)));
    typed
        .enumerate()
        .map(|(i, (kind, p))| SiteRow {
            index: i + 1,
            kind,
            x: format!("{:.4}", p[0]),
            y: format!("{:.4}", p[1]),
            z: format!("{:.4}", p[2]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_rows() {
        let fcc = count_row(Lattice::Fcc, SiteScope::Canonical);
        assert_eq!(fcc.atoms_per_cell, 4);
        assert_eq!(fcc.tetra, 8);
        assert_eq!(fcc.total, fcc.tetra + fcc.octa);

        let canonical = count_row(Lattice::Bcc, SiteScope::Canonical);
        assert_eq!(canonical.tetra, Lattice::Bcc.tetra_sites().len());
        assert_eq!(canonical.octa, Lattice::Bcc.octa_sites().len());
    }

    #[test]
    fn test_coordinate_rows_order() {
        let rows = coordinate_rows(&[[0.25, 0.25, 0.25]], &[[0.5, 0.5, 0.5]]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "tetra");
        assert_eq!(rows[1].kind, "octa");
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].x, "0.5000");
    }
}
