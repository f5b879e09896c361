//! 配置模块
//! 定义所有实验级别的常量和固定文件名（无命令行参数、无环境变量）

/// 键空间大小 N
pub const KEY_COUNT: usize = 10_000;

/// 工作负载种子
pub const WORKLOAD_SEED: u64 = 42;

/// 索引实验配置：(最小分支因子 t, 索引块大小字节数)
pub const INDEX_CONFIGS: [(u32, u64); 4] = [(2, 84), (3, 126), (4, 168), (5, 210)];

/// 外部排序 I/O 上界使用的块因子 b
pub const SORT_BLOCK_FACTOR: f64 = 3.0;

/// 搜索理论对比图使用的阶 d
pub const THEORY_ORDER: u32 = 5;

/// 实验数据文件
pub mod files {
    pub const INSERT_DATA: &str = "insert-data.txt";
    pub const SEARCH_DATA: &str = "search-data.txt";
    pub const DELETE_DATA: &str = "delete-data.txt";

    /// 外部排序测量表（制表符分隔）
    pub const SORT_MEASUREMENTS: &str = "measurements.csv";

    pub const RUNS_REPORT: &str = "runs.tsv";
    pub const IO_REPORT: &str = "io.tsv";

    pub const INSERT_READS_REPORT: &str = "insert-reads.tsv";
    pub const INSERT_WRITES_REPORT: &str = "insert-writes.tsv";
    pub const SEARCH_READS_REPORT: &str = "search-reads.tsv";
    pub const SEARCH_THEORY_REPORT: &str = "search-theory.tsv";
    pub const DELETE_READS_REPORT: &str = "delete-reads.tsv";
    pub const DELETE_WRITES_REPORT: &str = "delete-writes.tsv";
    pub const SIZE_REPORT: &str = "size.tsv";

    /// 引擎原始输出，例如 `search-engine-84.log`
    pub fn engine_log(op: &str, block_size: u64) -> String {
        format!("{}-engine-{}.log", op, block_size)
    }

    /// 计数器结果表，例如 `insert-result-126.txt`
    pub fn result(op: &str, block_size: u64) -> String {
        format!("{}-result-{}.txt", op, block_size)
    }

    /// 索引大小结果表
    pub fn size_result(block_size: u64) -> String {
        format!("size-result-{}.txt", block_size)
    }
}

/// 错误消息常量
pub mod messages {
    pub const PERMUTATION_FAILED: &str = "Failed to generate key permutation";
    pub const WORKLOAD_WRITE_FAILED: &str = "Failed to write workload files";
    pub const COLLECT_FAILED: &str = "Failed to collect engine results";
    pub const SORT_REPORT_FAILED: &str = "Failed to build external sort report";
    pub const INDEX_REPORT_FAILED: &str = "Failed to build index report";
}
