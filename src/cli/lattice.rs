//! # lattice / sites 子命令 CLI 定义
//!
//! 晶格生成参数与生成参数结构一一对应；越界值在执行阶段被截断而非拒绝。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/lattice.rs` 和 `commands/sites.rs`
//! - 映射到 `models/lattice.rs` 的 GenerationParams

use crate::models::{GenerationParams, Lattice, Mode, SiteScope};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 晶格类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LatticeKind {
    /// Simple cubic
    Sc,
    /// Body-centred cubic
    Bcc,
    /// Face-centred cubic
    Fcc,
}

impl From<LatticeKind> for Lattice {
    fn from(kind: LatticeKind) -> Self {
        match kind {
            LatticeKind::Sc => Lattice::Sc,
            LatticeKind::Bcc => Lattice::Bcc,
            LatticeKind::Fcc => Lattice::Fcc,
        }
    }
}

/// 生成模式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ModeKind {
    /// One conventional cell with interstitial site markers
    Demo,
    /// Tiled supercell with substitutional species
    Lattice,
}

impl From<ModeKind> for Mode {
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Demo => Mode::Demo,
            ModeKind::Lattice => Mode::Lattice,
        }
    }
}

/// 间隙位点范围
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ScopeKind {
    /// One representative per periodic image
    Canonical,
    /// Include boundary face images
    AllFaces,
}

impl From<ScopeKind> for SiteScope {
    fn from(kind: ScopeKind) -> Self {
        match kind {
            ScopeKind::Canonical => SiteScope::Canonical,
            ScopeKind::AllFaces => SiteScope::AllFaces,
        }
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LatticeOutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// XYZ coordinates
    Xyz,
    /// CSV (layer,x,y,z)
    Csv,
    /// JSON layers
    Json,
}

/// lattice 子命令参数
#[derive(Args, Debug)]
pub struct LatticeArgs {
    /// Generation mode
    #[arg(short, long, value_enum, default_value = "demo")]
    pub mode: ModeKind,

    /// Lattice type
    #[arg(short, long, value_enum, default_value = "bcc")]
    pub lattice: LatticeKind,

    /// Target number of base atoms (lattice mode, clamped to 100-1000000)
    #[arg(long, default_value_t = 100)]
    pub fe_count: i64,

    /// Base atom visual scale (0.01-1)
    #[arg(long, default_value_t = 0.6)]
    pub fe_size: f64,

    /// Substitutional species A fraction (0-0.05)
    #[arg(long, default_value_t = 0.0)]
    pub c_frac: f64,

    /// Species A size relative to base atoms (0.01-5)
    #[arg(long, default_value_t = 1.0)]
    pub c_size: f64,

    /// Substitutional species B fraction (0-0.05)
    #[arg(long, default_value_t = 0.0)]
    pub v_frac: f64,

    /// Species B size relative to base atoms (0.01-5)
    #[arg(long, default_value_t = 1.0)]
    pub v_size: f64,

    /// Number of interstitial hydrogen atoms (0-30)
    #[arg(long, default_value_t = 0)]
    pub h_count: i64,

    /// Hydrogen size relative to base atoms (0.01-1)
    #[arg(long, default_value_t = 0.5)]
    pub h_size: f64,

    /// Interstitial site marker size in demo renders (0.01-1)
    #[arg(long, default_value_t = 0.4)]
    pub site_size: f64,

    /// Interstitial site scope for demo mode
    #[arg(long, value_enum, default_value = "all-faces")]
    pub site_scope: ScopeKind,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    pub seed: u32,

    /// Output file path
    #[arg(short, long, default_value = "lattice.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<LatticeOutputFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub height: u32,

    /// Hide interstitial site markers in demo renders
    #[arg(long, default_value_t = false)]
    pub hide_sites: bool,

    /// Element labels for XYZ/CSV export: base,A,B,H
    #[arg(long, default_value = "Fe,C,V,H")]
    pub labels: String,
}

impl LatticeArgs {
    /// 组装（未截断的）生成参数
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            mode: self.mode.into(),
            lattice: self.lattice.into(),
            fe_count: self.fe_count,
            fe_size: self.fe_size,
            c_frac: self.c_frac,
            c_size: self.c_size,
            v_frac: self.v_frac,
            v_size: self.v_size,
            h_count: self.h_count,
            h_size: self.h_size,
            site_size: self.site_size,
            site_scope: self.site_scope.into(),
            seed: self.seed,
        }
    }
}

/// sites 子命令参数
#[derive(Args, Debug)]
pub struct SitesArgs {
    /// Lattice type (all lattices if omitted)
    #[arg(short, long, value_enum)]
    pub lattice: Option<LatticeKind>,

    /// Site scope
    #[arg(long, value_enum, default_value = "canonical")]
    pub site_scope: ScopeKind,

    /// Print every site coordinate
    #[arg(long, default_value_t = false)]
    pub coords: bool,
}
