//! 结构大纲（Outline）：仅存结构与路径，不复制大值，便于前端浏览大文档

use serde::Serialize;
use serde_json::Value;

/// 大纲默认节点上限
pub const DEFAULT_OUTLINE_LIMIT: usize = 2000;
const PREVIEW_CHARS: usize = 32;

/// JSON 节点类型（与展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    fn of(v: &Value) -> Self {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineNode {
    /// 节点在父级中的键名或 `[索引]`
    pub name: String,
    /// RFC 9535 JSONPath
    pub path: String,
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: usize,
    /// 轻量预览（字符串截断、容器只给数量）
    pub preview: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Outline {
    pub nodes: Vec<OutlineNode>,
    /// 达到节点上限后停止遍历
    pub truncated: bool,
}

/// 深度优先构建扁平大纲，最多 `limit` 个节点
pub fn build_outline(root: &Value, limit: usize) -> Outline {
    let mut outline = Outline {
        nodes: Vec::with_capacity(limit.min(1024)),
        truncated: false,
    };
    walk(&mut outline, limit, root, "$", "$", 0);
    outline
}

fn walk(out: &mut Outline, limit: usize, v: &Value, path: &str, name: &str, depth: usize) {
    if out.nodes.len() >= limit {
        out.truncated = true;
        return;
    }
    let children = match v {
        Value::Object(m) => m.len(),
        Value::Array(a) => a.len(),
        _ => 0,
    };
    out.nodes.push(OutlineNode {
        name: name.to_string(),
        path: path.to_string(),
        kind: NodeKind::of(v),
        children,
        preview: preview_of(v),
        depth,
    });

    match v {
        Value::Object(map) => {
            for (k, child) in map {
                walk(out, limit, child, &member_path(path, k), k, depth + 1);
                if out.truncated {
                    return;
                }
            }
        }
        Value::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                walk(out, limit, child, &format!("{path}[{idx}]"), &format!("[{idx}]"), depth + 1);
                if out.truncated {
                    return;
                }
            }
        }
        _ => {}
    }
}

/// 简单键用点号，其他用 bracket-notation
fn member_path(parent: &str, key: &str) -> String {
    let mut chars = key.chars();
    let shorthand = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if shorthand {
        format!("{parent}.{key}")
    } else {
        let escaped = key.replace('\\', "\\\\").replace('\'', "\\'");
        format!("{parent}['{escaped}']")
    }
}

fn preview_of(v: &Value) -> String {
    match v {
        // 以JSON字面量展示，保留首尾空白并转义引号
        Value::String(s) => {
            if s.chars().count() > PREVIEW_CHARS {
                let truncated: String = s.chars().take(PREVIEW_CHARS).collect();
                format!("{}...", Value::String(truncated))
            } else {
                Value::String(s.clone()).to_string()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
        Value::Array(a) => format!("[..] ({} items)", a.len()),
    }
}
