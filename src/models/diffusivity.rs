//! # 氢扩散系数数据模型
//!
//! 定义数据集分组、温度区段、扩散模型（标签联合）和采样点。
//!
//! ## 模型 JSON 表示
//! ```text
//! {"type": "single_point", "diffusivity_mm2_per_s": D}
//! {"type": "arrhenius", "D0_mm2_per_s": D0, "Q_J_per_mol": Q, "R_J_per_molK"?: R}
//! {"type": "power", "A_mm2_per_s": A, "n": n, "input": "theta_C"}
//! ```
//!
//! ## 依赖关系
//! - 被 `diffusivity/` 和 `commands/diffusivity/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 扩散模型
///
/// 未知 `type` 标签在解码时被拒绝，对应区段在归一化阶段丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    /// 单点常数 D
    SinglePoint {
        #[serde(rename = "diffusivity_mm2_per_s")]
        diffusivity: f64,
    },
    /// D0·exp(−Q/(R·T))
    Arrhenius {
        #[serde(rename = "D0_mm2_per_s")]
        d0: f64,
        #[serde(rename = "Q_J_per_mol")]
        q: f64,
        #[serde(
            rename = "R_J_per_molK",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        r: Option<f64>,
    },
    /// A·θⁿ，θ 为摄氏温度
    Power {
        #[serde(rename = "A_mm2_per_s")]
        a: f64,
        n: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<String>,
    },
}

impl Model {
    /// 模型类型名
    pub fn kind(&self) -> &'static str {
        match self {
            Model::SinglePoint { .. } => "single_point",
            Model::Arrhenius { .. } => "arrhenius",
            Model::Power { .. } => "power",
        }
    }
}

/// 散布带类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandType {
    Mean,
    Min,
    Max,
    None,
}

impl BandType {
    /// 从元数据标签或 id 后缀解析
    pub fn from_tag(tag: &str) -> Option<BandType> {
        match tag {
            "mean" => Some(BandType::Mean),
            "min" => Some(BandType::Min),
            "max" => Some(BandType::Max),
            _ => None,
        }
    }

    /// id 后缀（不含下划线）
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            BandType::Mean => Some("mean"),
            BandType::Min => Some("min"),
            BandType::Max => Some("max"),
            BandType::None => None,
        }
    }
}

impl std::fmt::Display for BandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffix().unwrap_or("-"))
    }
}

/// 材料信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
}

impl Material {
    /// 显示名称：牌号优先，其次材料族
    pub fn label(&self) -> Option<&str> {
        self.designation.as_deref().or(self.family.as_deref())
    }
}

/// 温度区段
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub entry_id: String,
    pub model: Model,
    /// 有效温度下限 (K)
    pub t_min: f64,
    /// 有效温度上限 (K)，恒大于 t_min
    pub t_max: f64,
    pub material: Option<Material>,
    /// 元数据中的散布带标签
    pub band_tag: Option<String>,
    pub conditions: Option<serde_json::Value>,
    pub reported_as: Option<serde_json::Value>,
}

impl Segment {
    /// 温度是否落在闭区间 [t_min, t_max] 内
    pub fn contains(&self, temperature_k: f64) -> bool {
        temperature_k >= self.t_min && temperature_k <= self.t_max
    }
}

/// 分组描述符
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDescriptor {
    pub id: String,
    pub label: String,
    pub source_id: Option<String>,
    pub source_title: String,
    /// [Tmin, Tmax] (K)
    pub temperature_range: [f64; 2],
    /// 按 t_min 升序
    pub segments: Vec<Segment>,
    pub band: BandType,
    pub material_label: Option<String>,
}

/// 采样点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "temperature_K")]
    pub temperature_k: f64,
    pub diffusivity: f64,
}
