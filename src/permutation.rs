//! 键排列模块
//! 生成稠密键空间 [0, N) 的均匀随机排列

use crate::error::{AppError, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// 键：[0, N) 内的非负整数
pub type Key = u64;

/// 键排列，[0, N) 中每个键恰好出现一次，生成后不可变
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    keys: Vec<Key>,
}

impl Permutation {
    /// 空排列（N = 0 时的空工作负载）
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// 从已有键序列构造，校验其为 [0, N) 上的双射
    pub fn from_keys(keys: Vec<Key>) -> Result<Self> {
        let n = keys.len();
        let mut seen = vec![false; n];
        for &key in &keys {
            let slot = seen
                .get_mut(key as usize)
                .ok_or_else(|| AppError::InvalidParameter(format!("not a permutation: key {} outside [0, {})", key, n)))?;
            if *slot {
                return Err(AppError::InvalidParameter(format!("not a permutation: key {} appears twice", key)));
            }
            *slot = true;
        }
        Ok(Self { keys })
    }

    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn into_keys(self) -> Vec<Key> {
        self.keys
    }
}

/// 排列生成器，随机源可注入以便复现
pub struct KeyPermutationGenerator<R = ChaCha8Rng> {
    rng: R,
}

impl KeyPermutationGenerator<ChaCha8Rng> {
    /// 创建带固定种子的生成器
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 使用操作系统熵源（真实实验用）
    pub fn from_os_rng() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }
}

impl<R: Rng> KeyPermutationGenerator<R> {
    /// 使用任意随机源
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 生成长度为 n 的排列（Fisher–Yates 洗牌）
    pub fn generate(&mut self, n: usize) -> Result<Permutation> {
        if n == 0 {
            return Err(AppError::InvalidSize(
                "key-space size must be positive, got 0".to_string(),
            ));
        }
        let mut keys: Vec<Key> = (0..n as Key).collect();
        keys.shuffle(&mut self.rng);
        Ok(Permutation { keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_bijection(perm: &Permutation, n: usize) -> bool {
        let mut sorted = perm.keys().to_vec();
        sorted.sort_unstable();
        sorted == (0..n as Key).collect::<Vec<_>>()
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut generator = KeyPermutationGenerator::new(1);
        assert!(matches!(generator.generate(0), Err(AppError::InvalidSize(_))));
    }

    #[test]
    fn same_seed_same_permutation() {
        let a = KeyPermutationGenerator::new(42).generate(1000).unwrap();
        let b = KeyPermutationGenerator::new(42).generate(1000).unwrap();
        let c = KeyPermutationGenerator::new(43).generate(1000).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn single_key() {
        let perm = KeyPermutationGenerator::from_os_rng().generate(1).unwrap();
        assert_eq!(perm.keys(), &[0]);
    }

    #[test]
    fn from_keys_validates_bijection() {
        assert!(Permutation::from_keys(vec![2, 0, 3, 1]).is_ok());
        assert!(matches!(
            Permutation::from_keys(vec![0, 0, 1]),
            Err(AppError::InvalidParameter(ref m)) if m.contains("twice")
        ));
        assert!(matches!(
            Permutation::from_keys(vec![0, 5]),
            Err(AppError::InvalidParameter(ref m)) if m.contains("outside")
        ));
        assert!(Permutation::from_keys(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn injected_rng_is_used() {
        let rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut generator = KeyPermutationGenerator::with_rng(rng);
        let perm = generator.generate(64).unwrap();
        assert!(is_bijection(&perm, 64));
    }

    /// 位置-值分桶的卡方检验：N=5，5000 个种子
    #[test]
    fn no_position_value_bias() {
        const N: usize = 5;
        const RUNS: u64 = 5000;
        let mut counts = [[0u64; N]; N];
        for seed in 0..RUNS {
            let perm = KeyPermutationGenerator::new(seed).generate(N).unwrap();
            for (pos, &key) in perm.keys().iter().enumerate() {
                counts[pos][key as usize] += 1;
            }
        }
        let expected = RUNS as f64 / N as f64;
        let chi_square: f64 = counts
            .iter()
            .flatten()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // 自由度介于 (N-1)^2 与 N(N-1) 之间，取 df=20 时 p<0.0001 的临界值
        assert!(chi_square < 50.0, "chi-square too large: {chi_square}");
    }

    proptest! {
        #[test]
        fn generated_is_bijection(n in 1usize..2000, seed in any::<u64>()) {
            let perm = KeyPermutationGenerator::new(seed).generate(n).unwrap();
            prop_assert_eq!(perm.len(), n);
            prop_assert!(is_bijection(&perm, n));
        }
    }
}
