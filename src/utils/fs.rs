//! IO helper: JSON file read/write and directory listing

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
    time::SystemTime,
};

use serde_json::Value;

use crate::model::snapshot_store::StoreError;

/// 从文件读取JSON数据（UTF-8文本）
pub fn read_json_file(p: &Path) -> Result<Value, StoreError> {
    let text = fs::read_to_string(p)?;
    let v: Value = serde_json::from_str(&text)?;
    Ok(v)
}

/// 将JSON数据保存到文件（2空格缩进，覆盖已有文件，无原子替换）
pub fn write_json_file(p: &Path, value: &Value) -> Result<(), StoreError> {
    let f = File::create(p)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value).map_err(io::Error::from)?;
    w.flush()?;
    Ok(())
}

/// 列出目录下所有条目及其最后修改时间
///
/// 不按扩展名过滤；任一条目 stat 失败则整体失败
pub fn list_modified(dir: &Path) -> Result<Vec<(String, SystemTime)>, StoreError> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // 跟随符号链接，与 stat 语义一致
        let modified = fs::metadata(entry.path())?.modified()?;
        out.push((entry.file_name().to_string_lossy().into_owned(), modified));
    }
    Ok(out)
}
