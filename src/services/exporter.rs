//! 结果导出服务 - 业务能力层
//!
//! 只负责"把结果列表写成 CSV 工件"能力，不关心流程。
//!
//! 表头固定为 `Item, Categoria, Confiança, Intenção, Resposta Sugerida`，
//! 数据行顺序与会话内持有的结果顺序一致（这是对外契约，不是实现巧合）。

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::AnalysisResult;

/// 空字段的占位符，避免表格软件里出现残缺单元格
const EMPTY_PLACEHOLDER: &str = "—";

/// CSV 表头
const HEADER: [&str; 5] = [
    "Item",
    "Categoria",
    "Confiança",
    "Intenção",
    "Resposta Sugerida",
];

/// 结果导出服务
pub struct ResultExporter {
    export_folder: String,
}

impl ResultExporter {
    /// 创建新的导出服务
    pub fn new() -> Self {
        Self {
            export_folder: ".".to_string(),
        }
    }

    /// 使用自定义导出目录创建
    pub fn with_path(folder: impl Into<String>) -> Self {
        Self {
            export_folder: folder.into(),
        }
    }

    /// 渲染 CSV 内容
    ///
    /// # 返回
    /// 结果列表为空时返回 None（不产生工件）
    pub fn render(&self, results: &[AnalysisResult]) -> Option<String> {
        if results.is_empty() {
            return None;
        }

        let mut lines = Vec::with_capacity(results.len() + 1);
        lines.push(render_row(&HEADER.map(String::from)));

        for result in results {
            let confidence = format!("{:.1}%", result.confidence * 100.0);
            lines.push(render_row(&[
                result.id.clone(),
                result.category.clone(),
                confidence,
                result.metadata.intent.clone(),
                result.suggested_reply.clone(),
            ]));
        }

        Some(lines.join("\n") + "\n")
    }

    /// 导出到文件
    ///
    /// 文件名嵌入当天日期：`analise-emails-<YYYY-MM-DD>.csv`
    ///
    /// # 返回
    /// 返回写入的文件路径；结果为空时返回 None
    pub fn export(&self, results: &[AnalysisResult]) -> Result<Option<PathBuf>> {
        let content = match self.render(results) {
            Some(content) => content,
            None => {
                debug!("结果列表为空，跳过导出");
                return Ok(None);
            }
        };

        let filename = format!(
            "analise-emails-{}.csv",
            chrono::Local::now().format("%Y-%m-%d")
        );
        let path = Path::new(&self.export_folder).join(filename);

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(content.as_bytes())?;

        debug!("CSV 已写入: {}", path.display());

        Ok(Some(path))
    }
}

impl Default for ResultExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// 渲染一行：每个单元格无条件加双引号，内嵌双引号按 CSV 惯例加倍转义
fn render_row(cells: &[String; 5]) -> String {
    cells
        .iter()
        .map(|cell| render_cell(cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_cell(value: &str) -> String {
    let value = if value.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        value
    };
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::AnalysisMetadata;

    fn result(id: &str, category: &str, confidence: f64, intent: &str, reply: &str) -> AnalysisResult {
        AnalysisResult {
            id: id.to_string(),
            category: category.to_string(),
            confidence,
            suggested_reply: reply.to_string(),
            metadata: AnalysisMetadata {
                intent: intent.to_string(),
            },
        }
    }

    #[test]
    fn test_empty_results_produce_no_artifact() {
        let exporter = ResultExporter::new();
        assert!(exporter.render(&[]).is_none());
    }

    #[test]
    fn test_two_row_document() {
        let exporter = ResultExporter::new();
        let csv = exporter
            .render(&[result("x", "Produtivo", 0.873, "suporte", "Ok")])
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "\"Item\",\"Categoria\",\"Confiança\",\"Intenção\",\"Resposta Sugerida\""
        );
        assert_eq!(lines[1], "\"x\",\"Produtivo\",\"87.3%\",\"suporte\",\"Ok\"");
    }

    #[test]
    fn test_rows_follow_state_order() {
        let exporter = ResultExporter::new();
        let csv = exporter
            .render(&[
                result("b", "Produtivo", 0.5, "status", "r1"),
                result("a", "Improdutivo", 0.2, "outros", "r2"),
            ])
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].starts_with("\"b\""));
        assert!(lines[2].starts_with("\"a\""));
    }

    #[test]
    fn test_empty_fields_render_placeholder() {
        let exporter = ResultExporter::new();
        let csv = exporter
            .render(&[result("x", "Improdutivo", 0.0, "", "")])
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"x\",\"Improdutivo\",\"0.0%\",\"—\",\"—\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let exporter = ResultExporter::new();
        let csv = exporter
            .render(&[result("x", "Produtivo", 1.0, "status", "diga \"oi\", por favor")])
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[1],
            "\"x\",\"Produtivo\",\"100.0%\",\"status\",\"diga \"\"oi\"\", por favor\""
        );
    }

    #[test]
    fn test_confidence_percentage_rounding() {
        let exporter = ResultExporter::new();
        let csv = exporter
            .render(&[result("x", "Produtivo", 0.999, "status", "Ok")])
            .unwrap();

        assert!(csv.contains("\"99.9%\""));
    }
}
