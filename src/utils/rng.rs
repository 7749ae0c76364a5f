//! # 可复现随机数生成器
//!
//! 32 位线性同余生成器 (LCG)，用于替位/间隙原子的随机分配。
//! 相同种子产生完全相同的序列。
//!
//! ## 依赖关系
//! - 被 `lattice/sampler.rs` 使用
//! - 无外部模块依赖

/// [0,1) 均匀浮点数来源
pub trait UniformSource {
    /// 下一个 [0,1) 区间的均匀浮点数
    fn next_float(&mut self) -> f64;

    /// 下一个 [0, n) 区间的均匀整数，n = 0 时返回 0
    fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_float() * n as f64).floor() as usize).min(n - 1)
    }
}

/// 线性同余生成器
///
/// `s ← 1664525·s + 1013904223 (mod 2³²)`，输出取状态高 24 位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    const MULTIPLIER: u32 = 1_664_525;
    const INCREMENT: u32 = 1_013_904_223;

    /// 创建生成器；种子 0 视为 1
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }
}

impl UniformSource for Lcg {
    fn next_float(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        (self.state >> 8) as f64 / (1u32 << 24) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_first_step() {
        let mut rng = Lcg::new(1);
        let value = rng.next_float();
        // 1664525 + 1013904223 = 1015568748
        assert_eq!(rng.state, 1_015_568_748);
        assert!((value - (1_015_568_748u32 >> 8) as f64 / 16_777_216.0).abs() < 1e-15);
    }

    #[test]
    fn test_seed_zero_is_one() {
        let mut a = Lcg::new(0);
        let mut b = Lcg::new(1);
        for _ in 0..10 {
            assert_eq!(a.next_float(), b.next_float());
        }
    }

    #[test]
    fn test_range_and_reproducibility() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..10_000 {
            let x = a.next_float();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.next_float());
        }
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            assert!(rng.next_index(5) < 5);
        }
        assert_eq!(rng.next_index(0), 0);
    }
}
