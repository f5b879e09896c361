//! 理论模型模块
//! 外部排序与多路索引的闭式 I/O 上界，均为无状态纯函数

use crate::error::{AppError, Result};

/// 外部排序上界
///
/// 趟数按二路归并计算，I/O 总量按块因子 b 参数化；两者假设不同，分别独立计算。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortBound {
    block_factor: f64,
}

impl SortBound {
    pub fn new(block_factor: f64) -> Result<Self> {
        if !(block_factor.is_finite() && block_factor > 0.0) {
            return Err(AppError::InvalidParameter(format!(
                "block factor must be positive, got {}",
                block_factor
            )));
        }
        Ok(Self { block_factor })
    }

    /// 期望趟数 ⌈log₂ N⌉，N = 0 时为 0
    pub fn run_count(&self, n: u64) -> f64 {
        ceil_log2(n)
    }

    /// 读写总次数上界 4·N·⌈log₂ N⌉ / b
    pub fn io_operations(&self, n: u64) -> f64 {
        4.0 * n as f64 * ceil_log2(n) / self.block_factor
    }

    pub fn run_series(&self, ns: &[u64]) -> Vec<f64> {
        ns.iter().map(|&n| self.run_count(n)).collect()
    }

    pub fn io_series(&self, ns: &[u64]) -> Vec<f64> {
        ns.iter().map(|&n| self.io_operations(n)).collect()
    }
}

fn ceil_log2(n: u64) -> f64 {
    if n <= 1 {
        0.0
    } else {
        (u64::BITS - (n - 1).leading_zeros()) as f64
    }
}

/// 多路索引（B 树，阶 d）探查深度上界
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexBound {
    order: u32,
}

impl IndexBound {
    /// d 必须 ≥ 2
    pub fn new(order: u32) -> Result<Self> {
        if order < 2 {
            return Err(AppError::InvalidParameter(format!(
                "node order must be at least 2, got {}",
                order
            )));
        }
        Ok(Self { order })
    }

    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// 悲观深度 log_d((N+1)/2)；N ≤ 1 时为 0
    pub fn probe_depth(&self, n: u64) -> f64 {
        if n <= 1 {
            return 0.0;
        }
        ((n as f64 + 1.0) / 2.0).log(self.order as f64)
    }

    /// 乐观深度 log_m(N+1) − 1，m = 2d − 1 为满节点的分支数
    pub fn optimistic_depth(&self, n: u64) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let m = 2.0 * self.order as f64 - 1.0;
        ((n as f64 + 1.0).log(m) - 1.0).max(0.0)
    }

    pub fn probe_series(&self, ns: &[u64]) -> Vec<f64> {
        ns.iter().map(|&n| self.probe_depth(n)).collect()
    }

    pub fn optimistic_series(&self, ns: &[u64]) -> Vec<f64> {
        ns.iter().map(|&n| self.optimistic_depth(n)).collect()
    }
}
