//! 报告模块
//! 生成供外部绘图工具使用的对比序列表（TSV，首行为列名）

use crate::error::{AppError, Result};

/// 一张对比图的数据：x 轴加若干同长度序列
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesTable {
    title: String,
    x_label: String,
    x: Vec<f64>,
    series: Vec<(String, Vec<f64>)>,
}

impl SeriesTable {
    pub fn new(title: &str, x_label: &str, x: Vec<f64>) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            x,
            series: Vec::new(),
        }
    }

    /// 以 0..len 为 x 轴（“第 N 次操作”）
    pub fn indexed(title: &str, x_label: &str, len: usize) -> Self {
        Self::new(title, x_label, (0..len).map(|i| i as f64).collect())
    }

    /// 添加一条序列，长度必须与 x 轴一致
    pub fn push(&mut self, label: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.x.len() {
            return Err(AppError::MalformedRecord {
                line: 0,
                reason: format!(
                    "{}: series '{}' has {} points, x axis has {}",
                    self.title,
                    label,
                    values.len(),
                    self.x.len()
                ),
            });
        }
        self.series.push((label.to_string(), values));
        Ok(())
    }

    pub fn push_counts(&mut self, label: &str, values: &[u64]) -> Result<()> {
        self.push(label, values.iter().map(|&v| v as f64).collect())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn series(&self, label: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_slice())
    }

    /// 渲染为 TSV：`# 标题` 注释行、列名行、数据行
    pub fn to_tsv(&self) -> String {
        let mut out = format!("# {}\n{}", self.title, self.x_label);
        for (label, _) in &self.series {
            out.push('\t');
            out.push_str(label);
        }
        out.push('\n');

        for (row, x) in self.x.iter().enumerate() {
            out.push_str(&x.to_string());
            for (_, values) in &self.series {
                out.push('\t');
                out.push_str(&values[row].to_string());
            }
            out.push('\n');
        }
        out
    }
}
