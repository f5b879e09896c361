//! 错误处理模块
//! 定义了所有应用级别的错误类型

use std::path::Path;
use thiserror::Error;

/// 应用主错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// 键空间大小非正
    #[error("Invalid key-space size: {0}")]
    InvalidSize(String),
    /// 模型参数越界（阶 d、块因子 b）
    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),
    /// 引擎输出行格式错误
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    /// 工作负载命令格式错误
    #[error("Malformed command at line {line}: {reason}")]
    MalformedCommand { line: usize, reason: String },
    /// 缺少输入文件
    #[error("Missing input file: {0}")]
    MissingInput(String),
    /// 外部引擎失败
    #[error("Engine error: {0}")]
    Engine(String),
    /// IO错误
    #[error("IO error: {0}")]
    Io(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl AppError {
    /// 读取输入文件时的错误转换：文件不存在归为 `MissingInput`
    pub fn from_input(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::MissingInput(path.display().to_string())
        } else {
            AppError::Io(format!("{}: {}", path.display(), err))
        }
    }
}

/// 错误上下文扩展trait
pub trait ErrorContext<T> {
    /// 添加上下文信息
    fn with_context(self, context: &str) -> Result<T>;
}

impl<T> ErrorContext<T> for Result<T> {
    fn with_context(self, context: &str) -> Result<T> {
        self.map_err(|e| match e {
            AppError::InvalidSize(msg) => AppError::InvalidSize(format!("{}: {}", context, msg)),
            AppError::InvalidParameter(msg) => {
                AppError::InvalidParameter(format!("{}: {}", context, msg))
            }
            AppError::MalformedRecord { line, reason } => AppError::MalformedRecord {
                line,
                reason: format!("{}: {}", context, reason),
            },
            AppError::MalformedCommand { line, reason } => AppError::MalformedCommand {
                line,
                reason: format!("{}: {}", context, reason),
            },
            AppError::MissingInput(msg) => AppError::MissingInput(format!("{}: {}", context, msg)),
            AppError::Engine(msg) => AppError::Engine(format!("{}: {}", context, msg)),
            AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
        })
    }
}

/// 读取整个输入文件
pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| AppError::from_input(path, e))
}
