//! # 扩散模型求值
//!
//! 在给定温度下对三种闭式模型求值：
//! - 单点: D
//! - Arrhenius: D0·exp(−Q/(R·T))，R 缺省为 8.314462618 J/(mol·K)
//! - 幂律: A·θⁿ，θ = T − 273.15 (°C)，仅支持 `input = "theta_C"`
//!
//! 结果为非正或非有限值时返回 `None`，调用方将其视为"该温度无采样点"。
//!
//! ## 依赖关系
//! - 被 `diffusivity/sampler.rs` 使用
//! - 使用 `models/diffusivity.rs` 的 Model

use crate::models::Model;

/// 气体常数 J/(mol·K)
pub const R_DEFAULT: f64 = 8.314462618;

/// 摄氏零度对应的开尔文温度
pub const CELSIUS_OFFSET: f64 = 273.15;

/// 幂律模型唯一支持的输入约定
pub const POWER_INPUT_CELSIUS: &str = "theta_C";

/// 在温度 `temperature_k` (K) 下求值
pub fn evaluate(model: &Model, temperature_k: f64) -> Option<f64> {
    let value = match model {
        Model::SinglePoint { diffusivity } => *diffusivity,
        Model::Arrhenius { d0, q, r } => {
            let r = r
                .filter(|r| r.is_finite() && *r != 0.0)
                .unwrap_or(R_DEFAULT);
            d0 * (-q / (r * temperature_k)).exp()
        }
        Model::Power { a, n, input } => {
            if input.as_deref() != Some(POWER_INPUT_CELSIUS) {
                return None;
            }
            let theta_c = temperature_k - CELSIUS_OFFSET;
            a * theta_c.powf(*n)
        }
    };

    (value.is_finite() && value > 0.0).then_some(value)
}
