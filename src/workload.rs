//! 工作负载模块
//! 将键排列编码为引擎的行式命令协议，并可反向解析

use crate::error::{AppError, Result};
use crate::permutation::{Key, Permutation};
use std::fmt;
use std::io::Write;

/// 引擎命令
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Insert { key: Key, value: Key },
    Search(Key),
    Remove(Key),
    PrintStats,
    ResetStats,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert { key, value } => write!(f, "insert\n{}:{}\n", key, value),
            Command::Search(key) => write!(f, "search\n{}\n", key),
            Command::Remove(key) => write!(f, "remove\n{}\n", key),
            Command::PrintStats => f.write_str("print stats\n"),
            Command::ResetStats => f.write_str("reset stats\n"),
        }
    }
}

/// 被测量的操作类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Insert,
    Search,
    Remove,
}

impl OpKind {
    pub const ALL: [OpKind; 3] = [OpKind::Insert, OpKind::Search, OpKind::Remove];

    /// 文件名前缀
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Insert => "insert",
            OpKind::Search => "search",
            OpKind::Remove => "delete",
        }
    }

    #[inline]
    fn command(self, key: Key) -> Command {
        match self {
            OpKind::Insert => Command::Insert { key, value: key },
            OpKind::Search => Command::Search(key),
            OpKind::Remove => Command::Remove(key),
        }
    }
}

/// 完整物化的命令序列
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workload {
    commands: Vec<Command>,
}

impl Workload {
    /// 按计划模式编码排列
    ///
    /// 插入计划对每个键重置统计，以测量单次插入的边际成本；
    /// 搜索/删除计划先建完整结构再逐个测量。
    pub fn plan(kind: OpKind, permutation: &Permutation) -> Self {
        let keys = permutation.keys();
        if keys.is_empty() {
            return Self::default();
        }

        let mut commands = match kind {
            OpKind::Insert => Vec::with_capacity(3 * keys.len()),
            OpKind::Search | OpKind::Remove => {
                let mut build = Vec::with_capacity(4 * keys.len() + 1);
                build.extend(keys.iter().map(|&k| OpKind::Insert.command(k)));
                build.push(Command::ResetStats);
                build
            }
        };

        for &key in keys {
            commands.push(kind.command(key));
            commands.push(Command::PrintStats);
            commands.push(Command::ResetStats);
        }

        Self { commands }
    }

    /// 解码命令协议文本
    pub fn parse(text: &str) -> Result<Self> {
        let mut commands = Vec::new();
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

        while let Some((line, directive)) = lines.next() {
            let command = match directive {
                "" => continue,
                "print stats" => Command::PrintStats,
                "reset stats" => Command::ResetStats,
                "insert" => {
                    let (arg_line, arg) = argument(&mut lines, line, directive)?;
                    let (key, value) = arg.split_once(':').ok_or_else(|| AppError::MalformedCommand {
                        line: arg_line,
                        reason: format!("expected <key>:<value>, got '{}'", arg),
                    })?;
                    Command::Insert {
                        key: parse_key(key, arg_line)?,
                        value: parse_key(value, arg_line)?,
                    }
                }
                "search" => {
                    let (arg_line, arg) = argument(&mut lines, line, directive)?;
                    Command::Search(parse_key(arg, arg_line)?)
                }
                "remove" => {
                    let (arg_line, arg) = argument(&mut lines, line, directive)?;
                    Command::Remove(parse_key(arg, arg_line)?)
                }
                other => {
                    return Err(AppError::MalformedCommand {
                        line,
                        reason: format!("unknown directive '{}'", other),
                    });
                }
            };
            commands.push(command);
        }

        Ok(Self { commands })
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 引擎应输出的统计行数
    pub fn print_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::PrintStats))
            .count()
    }

    /// 按顺序取出某类操作引用的键
    pub fn referenced_keys(&self, kind: OpKind) -> Vec<Key> {
        self.commands
            .iter()
            .filter_map(|c| match (kind, c) {
                (OpKind::Insert, Command::Insert { key, .. }) => Some(*key),
                (OpKind::Search, Command::Search(key)) => Some(*key),
                (OpKind::Remove, Command::Remove(key)) => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// 写出协议文本（每行一条指令或参数）
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for command in &self.commands {
            write!(writer, "{}", command)?;
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        self.commands.iter().map(Command::to_string).collect()
    }
}

fn argument<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    line: usize,
    directive: &str,
) -> Result<(usize, &'a str)> {
    lines.next().ok_or_else(|| AppError::MalformedCommand {
        line,
        reason: format!("'{}' is missing its argument line", directive),
    })
}

fn parse_key(token: &str, line: usize) -> Result<Key> {
    token.trim().parse().map_err(|_| AppError::MalformedCommand {
        line,
        reason: format!("'{}' is not a key", token),
    })
}
