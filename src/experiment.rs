//! 实验流程模块
//! 各批处理阶段：生成工作负载、收集引擎结果、生成排序/索引对比报告
//!
//! 每个阶段先在内存中构建全部输出，输入全部解析成功后才写文件。

use crate::config::{files, messages, INDEX_CONFIGS, THEORY_ORDER};
use crate::engine::{collect_counters, Device, RecordedEngine};
use crate::error::{read_input, AppError, ErrorContext, Result};
use crate::model::{IndexBound, SortBound};
use crate::parser::MeasurementTable;
use crate::permutation::KeyPermutationGenerator;
use crate::report::SeriesTable;
use crate::workload::{OpKind, Workload};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 待写出的文件：(文件名, 内容)
type Output = (String, String);

/// 工作负载文件名
pub fn data_file(kind: OpKind) -> &'static str {
    match kind {
        OpKind::Insert => files::INSERT_DATA,
        OpKind::Search => files::SEARCH_DATA,
        OpKind::Remove => files::DELETE_DATA,
    }
}

/// 删除本阶段已写出（或写了一半）的文件
fn discard_outputs(paths: &[PathBuf]) {
    for path in paths {
        if path.is_dir() {
            continue;
        }
        if let Err(cleanup) = std::fs::remove_file(path) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %cleanup, "failed to remove partial output");
            }
        }
    }
}

/// 写出全部文件；任一失败则删除已写出的文件以及写了一半的目标文件
fn write_outputs(dir: &Path, outputs: Vec<Output>) -> Result<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(outputs.len());
    for (name, content) in outputs {
        let path = dir.join(&name);
        if let Err(e) = std::fs::write(&path, content) {
            written.push(path.clone());
            discard_outputs(&written);
            return Err(AppError::Io(format!("{}: {}", path.display(), e)));
        }
        debug!(path = %path.display(), "wrote output");
        written.push(path);
    }
    Ok(written)
}

/// 阶段一：由同一排列生成插入/搜索/删除三个工作负载文件
pub fn generate_workloads(dir: &Path, key_count: usize, seed: u64) -> Result<Vec<PathBuf>> {
    let permutation = KeyPermutationGenerator::new(seed)
        .generate(key_count)
        .with_context(messages::PERMUTATION_FAILED)?;
    info!(key_count, seed, "generated key permutation");

    let outputs = OpKind::ALL
        .iter()
        .map(|&kind| {
            let workload = Workload::plan(kind, &permutation);
            debug!(op = kind.name(), commands = workload.len(), "encoded workload");
            (data_file(kind).to_string(), workload.to_text())
        })
        .collect();

    write_outputs(dir, outputs)
}

/// 阶段二：读取引擎日志，按工作负载校验后写出计数器结果表
pub fn collect_results(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();

    for kind in OpKind::ALL {
        let data_path = dir.join(data_file(kind));
        let workload = Workload::parse(&read_input(&data_path)?).with_context(data_file(kind))?;

        for &(order, block_size) in INDEX_CONFIGS.iter() {
            let log = files::engine_log(kind.name(), block_size);
            let mut engine = RecordedEngine::new(dir.join(&log));
            let rows = collect_counters(&mut engine, &workload, Device::Index).with_context(&log)?;
            info!(op = kind.name(), order, block_size, rows = rows.len(), "collected engine counters");

            let counters = MeasurementTable::from_columns(vec![
                rows.iter().map(|r| r.reads).collect(),
                rows.iter().map(|r| r.writes).collect(),
            ])?;
            outputs.push((files::result(kind.name(), block_size), counters.to_text()));

            // 插入过程中每次快照的索引大小
            if kind == OpKind::Insert {
                let sizes = MeasurementTable::from_columns(vec![rows.iter().map(|r| r.size).collect()])?;
                outputs.push((files::size_result(block_size), sizes.to_text()));
            }
        }
    }

    write_outputs(dir, outputs)
}

/// 阶段三：外部排序的趟数与 I/O 对比
///
/// 输入列：`[runs_measured, io_measured, io_measured_2, N]`
pub fn sort_report(dir: &Path, block_factor: f64) -> Result<Vec<PathBuf>> {
    let bound = SortBound::new(block_factor)?;
    let table = MeasurementTable::from_file(&dir.join(files::SORT_MEASUREMENTS))?;
    table.require_width(4).with_context(files::SORT_MEASUREMENTS)?;
    if table.is_empty() {
        warn!(file = files::SORT_MEASUREMENTS, "no sort measurements found");
    }

    let ns: Vec<u64> = if table.is_empty() { Vec::new() } else { table.column(3)?.to_vec() };
    let x: Vec<f64> = ns.iter().map(|&n| n as f64).collect();

    let mut runs = SeriesTable::new("Sort runs vs N", "N", x.clone());
    let mut io = SeriesTable::new("Sort I/O operations vs N", "N", x);
    if !table.is_empty() {
        runs.push_counts("measured_runs", table.column(0)?)?;
        io.push_counts("measured_reads", table.column(1)?)?;
        io.push_counts("measured_writes", table.column(2)?)?;
    }
    runs.push("theoretical_runs", bound.run_series(&ns))?;
    io.push("theoretical_io", bound.io_series(&ns))?;
    info!(points = ns.len(), block_factor, "built sort report");

    write_outputs(
        dir,
        vec![
            (files::RUNS_REPORT.to_string(), runs.to_tsv()),
            (files::IO_REPORT.to_string(), io.to_tsv()),
        ],
    )
}

/// 某操作在各阶 t 下的结果表
struct OrderResults {
    order: u32,
    table: MeasurementTable,
}

fn load_results(dir: &Path, name: impl Fn(u64) -> String, width: usize) -> Result<Vec<OrderResults>> {
    INDEX_CONFIGS
        .iter()
        .map(|&(order, block_size)| {
            let file = name(block_size);
            let table = MeasurementTable::from_file(&dir.join(&file))?;
            table.require_width(width).with_context(&file)?;
            Ok(OrderResults { order, table })
        })
        .collect()
}

/// 按阶 t 汇总同一列为一张宽表
fn chart(
    title: &str,
    x_label: &str,
    results: &[OrderResults],
    column: usize,
    scale: f64,
) -> Result<SeriesTable> {
    let len = results.first().map_or(0, |r| r.table.rows());
    let mut table = SeriesTable::indexed(title, x_label, len);
    for result in results {
        let values: Vec<f64> = if result.table.is_empty() {
            Vec::new()
        } else {
            result.table.column(column)?.iter().map(|&v| v as f64 / scale).collect()
        };
        table.push(&format!("t={}", result.order), values)?;
    }
    Ok(table)
}

/// 阶段四：多路索引各操作的读写次数、大小及搜索深度理论对比
pub fn index_report(dir: &Path) -> Result<Vec<PathBuf>> {
    let insert = load_results(dir, |b| files::result(OpKind::Insert.name(), b), 2)?;
    let search = load_results(dir, |b| files::result(OpKind::Search.name(), b), 2)?;
    let delete = load_results(dir, |b| files::result(OpKind::Remove.name(), b), 2)?;
    let size = load_results(dir, files::size_result, 1)?;

    let theory_results = search
        .iter()
        .find(|r| r.order == THEORY_ORDER)
        .ok_or_else(|| AppError::InvalidParameter(format!("no index configuration for order {}", THEORY_ORDER)))?;
    let bound = IndexBound::new(THEORY_ORDER)?;

    // 搜索在完整建好的结构上进行，每个点的 N 都是记录总数
    let records = theory_results.table.rows();
    let ns = vec![records as u64; records];
    let mut theory = SeriesTable::indexed("Search reads vs theory", "record", records);
    theory.push("pessimistic", bound.probe_series(&ns))?;
    theory.push("optimistic", bound.optimistic_series(&ns))?;
    if records > 0 {
        theory.push_counts(&format!("t={}", THEORY_ORDER), theory_results.table.column(0)?)?;
    }

    let tables = vec![
        (files::INSERT_READS_REPORT, chart("Reads during insert", "records in index", &insert, 0, 1.0)?),
        (files::INSERT_WRITES_REPORT, chart("Writes during insert", "records in index", &insert, 1, 1.0)?),
        (files::SEARCH_READS_REPORT, chart("Reads during search", "record", &search, 0, 1.0)?),
        (files::DELETE_READS_REPORT, chart("Reads during delete", "record", &delete, 0, 1.0)?),
        (files::DELETE_WRITES_REPORT, chart("Writes during delete", "record", &delete, 1, 1.0)?),
        (files::SIZE_REPORT, chart("Index size [KiB]", "records in index", &size, 0, 1024.0)?),
        (files::SEARCH_THEORY_REPORT, theory),
    ];
    for (name, table) in &tables {
        debug!(file = name, title = table.title(), points = table.len(), "built index chart");
    }
    info!(charts = tables.len(), records, "built index report");

    write_outputs(
        dir,
        tables.into_iter().map(|(name, table)| (name.to_string(), table.to_tsv())).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_file_names() {
        assert_eq!(data_file(OpKind::Insert), "insert-data.txt");
        assert_eq!(data_file(OpKind::Search), "search-data.txt");
        assert_eq!(data_file(OpKind::Remove), "delete-data.txt");
    }

    #[test]
    fn write_outputs_cleans_up_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("blocked")).unwrap();
        let outputs = vec![
            ("first.tsv".to_string(), "a\n".to_string()),
            // 目标是目录，写入必然失败
            ("blocked".to_string(), "b\n".to_string()),
        ];
        assert!(write_outputs(dir.path(), outputs).is_err());
        assert!(!dir.path().join("first.tsv").exists());
        assert!(dir.path().join("blocked").is_dir());
    }

    #[test]
    fn write_outputs_returns_written_paths() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = vec![
            ("a.tsv".to_string(), "1\n".to_string()),
            ("b.tsv".to_string(), "2\n".to_string()),
        ];
        let written = write_outputs(dir.path(), outputs).unwrap();
        assert_eq!(written, vec![dir.path().join("a.tsv"), dir.path().join("b.tsv")]);
        assert_eq!(std::fs::read_to_string(&written[1]).unwrap(), "2\n");
    }

    /// 目标文件已创建但写入失败（设备已满）时，目标本身也要删除
    #[cfg(target_os = "linux")]
    #[test]
    fn write_outputs_removes_half_written_target() {
        if !Path::new("/dev/full").exists() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("full.tsv");
        std::os::unix::fs::symlink("/dev/full", &full).unwrap();
        let outputs = vec![
            ("first.tsv".to_string(), "a\n".to_string()),
            ("full.tsv".to_string(), "b\n".to_string()),
        ];
        assert!(write_outputs(dir.path(), outputs).is_err());
        assert!(!dir.path().join("first.tsv").exists());
        assert!(std::fs::symlink_metadata(&full).is_err());
    }

    #[test]
    fn sort_report_rejects_bad_block_factor() {
        let dir = tempfile::tempdir().unwrap();
        let err = sort_report(dir.path(), 0.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }
}
