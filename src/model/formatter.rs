//! 文本校验与格式化：解析粘贴的JSON，输出2空格缩进文本、行数与结构大纲

use serde_json::Value;

use crate::model::outline::{build_outline, Outline};

#[derive(Debug, Clone)]
pub enum FormatReport {
    Valid {
        formatted: String,
        line_count: usize,
        outline: Outline,
    },
    /// 解析失败；行列号从1开始
    Invalid {
        message: String,
        line: usize,
        column: usize,
    },
}

impl FormatReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, FormatReport::Valid { .. })
    }
}

/// 校验并格式化文本
///
/// 只有重新序列化失败才返回 `Err`；语法错误体现在 `FormatReport::Invalid`
pub fn format_text(text: &str, outline_limit: usize) -> Result<FormatReport, serde_json::Error> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            return Ok(FormatReport::Invalid {
                message: e.to_string(),
                line: e.line(),
                column: e.column(),
            })
        }
    };
    let formatted = serde_json::to_string_pretty(&value)?;
    let line_count = formatted.split('\n').count();
    Ok(FormatReport::Valid {
        formatted,
        line_count,
        outline: build_outline(&value, outline_limit),
    })
}
