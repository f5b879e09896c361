//! 结果解析模块
//! 将引擎输出的空白分隔数值表解析为按列组织的测量序列

use crate::error::{read_input, AppError, ErrorContext, Result};
use std::path::Path;

/// 测量表：每列一个有序序列，行序即操作顺序
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasurementTable {
    columns: Vec<Vec<u64>>,
}

impl MeasurementTable {
    /// 解析文本表格（制表符或空格分隔，无表头，空行忽略）
    pub fn parse(text: &str) -> Result<Self> {
        let mut columns: Vec<Vec<u64>> = Vec::new();
        let mut width: Option<usize> = None;

        for (i, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            match width {
                None => {
                    width = Some(tokens.len());
                    columns = vec![Vec::new(); tokens.len()];
                }
                Some(w) if w != tokens.len() => {
                    return Err(AppError::MalformedRecord {
                        line: i + 1,
                        reason: format!("expected {} columns, found {}", w, tokens.len()),
                    });
                }
                Some(_) => {}
            }

            for (column, token) in columns.iter_mut().zip(&tokens) {
                column.push(parse_counter(token, i + 1)?);
            }
        }

        Ok(Self { columns })
    }

    /// 读取并解析结果文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = read_input(path)?;
        Self::parse(&text).with_context(&path.display().to_string())
    }

    /// 新建表，各列长度必须一致
    pub fn from_columns(columns: Vec<Vec<u64>>) -> Result<Self> {
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().position(|c| c.len() != first.len()) {
                return Err(AppError::MalformedRecord {
                    line: 0,
                    reason: format!("column {} has {} rows, expected {}", bad, columns[bad].len(), first.len()),
                });
            }
        }
        Ok(Self { columns })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// 取第 index 列
    pub fn column(&self, index: usize) -> Result<&[u64]> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::MalformedRecord {
                line: 0,
                reason: format!("table has {} columns, column {} requested", self.width(), index),
            })
    }

    pub fn columns(&self) -> &[Vec<u64>] {
        &self.columns
    }

    /// 要求至少 n 列
    pub fn require_width(&self, n: usize) -> Result<()> {
        if !self.is_empty() && self.width() < n {
            return Err(AppError::MalformedRecord {
                line: 1,
                reason: format!("expected at least {} columns, found {}", n, self.width()),
            });
        }
        Ok(())
    }

    /// 以空格分隔重新序列化，行序不变
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in 0..self.rows() {
            let line: Vec<String> = self.columns.iter().map(|c| c[row].to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

fn parse_counter(token: &str, line: usize) -> Result<u64> {
    if token.starts_with('-') {
        return Err(AppError::MalformedRecord {
            line,
            reason: format!("negative value '{}'", token),
        });
    }
    token.parse().map_err(|_| AppError::MalformedRecord {
        line,
        reason: format!("non-numeric token '{}'", token),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_columns_in_row_order() {
        let table = MeasurementTable::parse("3 1\n5\t2\n\n4 0\n").unwrap();
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows(), 3);
        assert_eq!(table.column(0).unwrap(), &[3, 5, 4]);
        assert_eq!(table.column(1).unwrap(), &[1, 2, 0]);
        assert!(table.column(2).is_err());
    }

    #[test]
    fn empty_input_is_empty_table() {
        let table = MeasurementTable::parse("\n\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert_eq!(table.to_text(), "");
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = MeasurementTable::parse("1 2\n3 4 5\n").unwrap_err();
        assert_eq!(
            err,
            AppError::MalformedRecord {
                line: 2,
                reason: "expected 2 columns, found 3".to_string(),
            }
        );
    }

    #[test]
    fn bad_tokens_are_rejected() {
        let err = MeasurementTable::parse("1 2\n3 -4\n").unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { line: 2, ref reason } if reason.contains("negative")));

        let err = MeasurementTable::parse("1 abc\n").unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { line: 1, ref reason } if reason.contains("non-numeric")));

        assert!(MeasurementTable::parse("1.5 2\n").is_err());
    }

    #[test]
    fn from_file_reports_missing_and_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search-result-84.txt");
        assert!(matches!(MeasurementTable::from_file(&path), Err(AppError::MissingInput(_))));

        std::fs::write(&path, "1 2\nx 3\n").unwrap();
        let err = MeasurementTable::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("search-result-84.txt"));
    }

    #[test]
    fn from_columns_checks_lengths() {
        assert!(MeasurementTable::from_columns(vec![vec![1, 2], vec![3]]).is_err());
        let table = MeasurementTable::from_columns(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(table.to_text(), "1 3\n2 4\n");
    }

    proptest! {
        #[test]
        fn reserialize_preserves_rows(rows in prop::collection::vec(prop::collection::vec(any::<u64>(), 3), 0..50)) {
            let text: String = rows
                .iter()
                .map(|r| format!("{}\t{}\t{}\n", r[0], r[1], r[2]))
                .collect();
            let table = MeasurementTable::parse(&text).unwrap();
            prop_assert_eq!(table.rows(), rows.len());
            let again = MeasurementTable::parse(&table.to_text()).unwrap();
            prop_assert_eq!(&again, &table);
            prop_assert_eq!(table.to_text(), text.replace('\t', " "));
        }
    }
}
