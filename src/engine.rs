//! 引擎边界模块
//! 被测引擎只是一个能力边界：接收命令流，返回计数器输出

use crate::error::{read_input, AppError, Result};
use crate::workload::Workload;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command as ProcessCommand, Stdio};
use tracing::{debug, warn};

/// 引擎能力trait，统一接口
pub trait StatsEngine {
    /// 执行工作负载并返回引擎原始输出
    fn run(&mut self, workload: &Workload) -> Result<String>;

    /// 引擎名称（用于日志）
    fn name(&self) -> String;
}

/// 文件交接：引擎已离线运行，输出保存在日志文件中
pub struct RecordedEngine {
    log_path: PathBuf,
}

impl RecordedEngine {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }
}

impl StatsEngine for RecordedEngine {
    fn run(&mut self, _workload: &Workload) -> Result<String> {
        read_input(&self.log_path)
    }

    fn name(&self) -> String {
        format!("recorded:{}", self.log_path.display())
    }
}

/// 子进程管道：命令流写入 stdin，从 stdout 读取计数器
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl StatsEngine for ProcessEngine {
    fn run(&mut self, workload: &Workload) -> Result<String> {
        let mut child = ProcessCommand::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AppError::Engine(format!("{}: {}", self.program.display(), e)))?;

        // 整个工作负载先物化再交给引擎；写完后关闭 stdin 以发出 EOF。
        // 引擎边读边写 stdout，stdin 必须由单独的线程灌入，否则双方管道写满后互相阻塞
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Engine("engine stdin unavailable".to_string()))?;
        let text = workload.to_text();
        let feeder = std::thread::spawn(move || stdin.write_all(text.as_bytes()));

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(AppError::Engine(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }
        feeder
            .join()
            .map_err(|_| AppError::Engine("stdin feeder panicked".to_string()))??;
        String::from_utf8(output.stdout)
            .map_err(|e| AppError::Engine(format!("engine output is not UTF-8: {}", e)))
    }

    fn name(&self) -> String {
        format!("process:{}", self.program.display())
    }
}

/// 引擎上的块设备
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Index,
    Data,
}

impl Device {
    fn label(self) -> &'static str {
        match self {
            Device::Index => "Index:",
            Device::Data => "Data:",
        }
    }
}

/// 一次 `print stats` 报告的设备计数器
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub reads: u64,
    pub writes: u64,
    pub size: u64,
}

/// 去除 ANSI 颜色转义序列
fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI 序列以 0x40..=0x7E 范围的字节结束
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) && c != '[' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// 从引擎原始输出中提取某设备的统计行
///
/// 形如 `Index:\tReads->R\tWrites->W\tSize->S`，其他行（Found、横幅等）被忽略。
pub fn extract_stats(output: &str, device: Device) -> Result<Vec<DeviceStats>> {
    let mut rows = Vec::new();
    for (i, raw) in output.lines().enumerate() {
        let line = strip_ansi(raw);
        let Some(rest) = line.trim().strip_prefix(device.label()) else {
            continue;
        };

        let mut stats = DeviceStats::default();
        let (mut has_reads, mut has_writes, mut has_size) = (false, false, false);
        for field in rest.split_whitespace() {
            let (name, value) = field.split_once("->").ok_or_else(|| AppError::MalformedRecord {
                line: i + 1,
                reason: format!("expected <name>-><value>, got '{}'", field),
            })?;
            let value: u64 = value.parse().map_err(|_| AppError::MalformedRecord {
                line: i + 1,
                reason: format!("'{}' is not a non-negative integer", value),
            })?;
            match name {
                "Reads" => (stats.reads, has_reads) = (value, true),
                "Writes" => (stats.writes, has_writes) = (value, true),
                "Size" => (stats.size, has_size) = (value, true),
                other => debug!(field = other, "ignoring unknown stats field"),
            }
        }
        if !(has_reads && has_writes && has_size) {
            return Err(AppError::MalformedRecord {
                line: i + 1,
                reason: "stats line lacks Reads, Writes or Size".to_string(),
            });
        }
        rows.push(stats);
    }
    Ok(rows)
}

/// 运行引擎并按工作负载校验统计行数
///
/// 引擎在输入结束后总会再打印一次累计统计：必须恰好得到 k+1 行（k 为 print stats 条数），
/// 最后一行被丢弃。
pub fn collect_counters<E: StatsEngine>(
    engine: &mut E,
    workload: &Workload,
    device: Device,
) -> Result<Vec<DeviceStats>> {
    let output = engine.run(workload)?;
    let mut rows = extract_stats(&output, device)?;
    let expected = workload.print_count();

    if rows.len() != expected + 1 {
        warn!(engine = %engine.name(), expected, found = rows.len(), "stats row count mismatch");
        return Err(AppError::MalformedRecord {
            line: rows.len(),
            reason: format!(
                "{}: expected {} stats rows plus the end-of-input summary for {:?}, found {}",
                engine.name(),
                expected,
                device,
                rows.len()
            ),
        });
    }
    rows.pop();
    debug!(engine = %engine.name(), rows = rows.len(), "collected counters");
    Ok(rows)
}
