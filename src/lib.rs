//! 外部排序与多路索引 I/O 成本模型的基准测试库
//! 
//! 这个项目本身不实现排序或索引算法，而是驱动外部引擎并对比测量值与理论上界，
//! 分为四个批处理阶段（见 `src/bin/`）。
//! 
//! 特性：
//! - 可复现的键排列（ChaCha8 种子随机源，可注入）
//! - 插入/搜索/删除三种测量计划共享同一排列
//! - 严格的结果解析（格式错误立即失败，不做修补）
//! - 外部排序与 B 树的闭式理论上界

pub mod config;
pub mod error;
pub mod permutation;
pub mod workload;
pub mod engine;
pub mod parser;
pub mod model;
pub mod report;
pub mod experiment;

/// 初始化日志输出（固定 INFO 级别，不读取环境变量）
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();
}
