//! SnapshotStore：单一扁平目录下的JSON快照保存、列出与恢复
//!
//! 目录是唯一共享资源；不加锁、不做原子替换，同名写入后写者胜出

use std::{
    io,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::utils::fs::{list_modified, read_json_file, write_json_file};
use crate::utils::timestamp::{filename_stamp, iso8601_from_system};

/// 列表默认返回的最近快照数量
pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const SNAPSHOT_EXTENSION: &str = ".json";
pub const AUTO_NAME_PREFIX: &str = "json-";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("快照不存在: {0}")]
    NotFound(String),
    #[error("非法输入: {0}")]
    InvalidInput(String),
    #[error("IO失败: {0}")]
    Io(#[from] io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 文件名如何映射到存储目录
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// 只接受单个普通文件名，拒绝分隔符与 `..`
    #[default]
    Contained,
    /// 原样拼接到目录之后，允许越出存储目录
    Verbatim,
}

impl FromStr for NamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contained" => Ok(NamePolicy::Contained),
            "verbatim" => Ok(NamePolicy::Verbatim),
            other => Err(format!("未知的文件名策略: {other}（可选 contained / verbatim）")),
        }
    }
}

/// 列表项：文件名 + 最后修改时间（ISO-8601）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub filename: String,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    policy: NamePolicy,
    list_limit: usize,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            policy: NamePolicy::default(),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> NamePolicy {
        self.policy
    }

    /// 按策略把文件名解析为目录内路径
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, StoreError> {
        if filename.is_empty() {
            return Err(StoreError::InvalidInput("文件名为空".into()));
        }
        match self.policy {
            NamePolicy::Contained => {
                if !is_plain_file_name(filename) {
                    return Err(StoreError::InvalidInput(format!("文件名不合法: {filename}")));
                }
                Ok(self.dir.join(filename))
            }
            // 前导分隔符不能让 join 换掉根目录
            NamePolicy::Verbatim => Ok(self.dir.join(filename.trim_start_matches(['/', '\\']))),
        }
    }

    /// 保存快照，返回最终文件名
    ///
    /// `custom_name` 为空或缺省时按当前时间生成 `json-<时间戳>.json`
    pub fn save(&self, content: &Value, custom_name: Option<&str>) -> Result<String, StoreError> {
        self.save_at(content, custom_name, Utc::now())
    }

    pub(crate) fn save_at(
        &self,
        content: &Value,
        custom_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let filename = match custom_name.filter(|n| !n.is_empty()) {
            Some(name) => format!("{name}{SNAPSHOT_EXTENSION}"),
            None => format!("{AUTO_NAME_PREFIX}{}{SNAPSHOT_EXTENSION}", filename_stamp(now)),
        };
        let path = self.resolve(&filename)?;
        write_json_file(&path, content)?;
        tracing::debug!("快照已写入: {}", path.display());
        Ok(filename)
    }

    /// 最近修改的快照，按修改时间倒序，最多 `list_limit` 条
    pub fn list_recent(&self) -> Result<Vec<SnapshotEntry>, StoreError> {
        let mut entries: Vec<SnapshotEntry> = list_modified(&self.dir)?
            .into_iter()
            .map(|(filename, modified)| SnapshotEntry {
                filename,
                timestamp: iso8601_from_system(modified),
            })
            .collect();
        // 字符串比较即时间比较（格式已统一）；sort_by 稳定，同时刻保持目录顺序
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(self.list_limit);
        Ok(entries)
    }

    /// 读取并解析指定快照
    pub fn restore(&self, filename: &str) -> Result<Value, StoreError> {
        let path = self.resolve(filename)?;
        match read_json_file(&path) {
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(filename.to_string()))
            }
            other => other,
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut comps = Path::new(name).components();
    matches!((comps.next(), comps.next()), (Some(Component::Normal(_)), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn create_store() -> (TempDir, SnapshotStore) {
        let dir = TempDir::new().expect("创建临时目录失败");
        let store = SnapshotStore::new(dir.path());
        (dir, store)
    }

    /// 显式设置修改时间，使排序可预期
    fn touch(store: &SnapshotStore, name: &str, secs_ago: u64) {
        let f = File::options()
            .write(true)
            .open(store.dir().join(name))
            .expect("打开文件失败");
        f.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .expect("设置修改时间失败");
    }

    #[test]
    fn test_custom_name_round_trip() {
        let (_dir, store) = create_store();
        let content = json!({"z": 1, "a": [true, null, "文本"], "m": {"n": 1.5}});

        let filename = store.save(&content, Some("foo")).unwrap();
        assert_eq!(filename, "foo.json");

        let restored = store.restore("foo.json").unwrap();
        assert_eq!(restored, content);
    }

    #[test]
    fn test_key_order_preserved_on_disk() {
        let (_dir, store) = create_store();
        let content: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        store.save(&content, Some("order")).unwrap();

        let text = fs::read_to_string(store.dir().join("order.json")).unwrap();
        assert_eq!(text, "{\n  \"b\": 1,\n  \"a\": 2\n}");
    }

    #[test]
    fn test_scalar_content_round_trip() {
        let (_dir, store) = create_store();
        for (i, v) in [json!(null), json!("s"), json!(3), json!(false), json!([])].iter().enumerate() {
            let name = format!("scalar{i}");
            store.save(v, Some(name.as_str())).unwrap();
            assert_eq!(&store.restore(&format!("{name}.json")).unwrap(), v);
        }
    }

    #[test]
    fn test_auto_name_format() {
        let (_dir, store) = create_store();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();

        let filename = store.save_at(&json!({}), None, now).unwrap();
        assert_eq!(filename, "json-2024-05-01T10-20-30-000Z.json");
        assert!(store.dir().join(&filename).exists());
    }

    #[test]
    fn test_empty_custom_name_falls_back_to_auto() {
        let (_dir, store) = create_store();
        let filename = store.save(&json!(1), Some("")).unwrap();
        assert!(filename.starts_with(AUTO_NAME_PREFIX));
        assert!(filename.ends_with(SNAPSHOT_EXTENSION));
    }

    #[test]
    fn test_auto_names_distinct_across_instants() {
        let (_dir, store) = create_store();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();
        let t2 = t1 + chrono::Duration::milliseconds(1);

        let a = store.save_at(&json!(1), None, t1).unwrap();
        let b = store.save_at(&json!(2), None, t2).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.list_recent().unwrap().len(), 2);
    }

    #[test]
    fn test_overwrite_same_name() {
        let (_dir, store) = create_store();
        store.save(&json!({"v": 1}), Some("same")).unwrap();
        store.save(&json!({"v": 2}), Some("same")).unwrap();

        assert_eq!(store.restore("same.json").unwrap(), json!({"v": 2}));
        assert_eq!(store.list_recent().unwrap().len(), 1);
    }

    #[test]
    fn test_list_orders_newest_first() {
        let (_dir, store) = create_store();
        for (name, age) in [("old", 300), ("new", 10), ("mid", 100)] {
            store.save(&json!(name), Some(name)).unwrap();
            touch(&store, &format!("{name}.json"), age);
        }

        let names: Vec<String> = store
            .list_recent()
            .unwrap()
            .into_iter()
            .map(|e| e.filename)
            .collect();
        assert_eq!(names, vec!["new.json", "mid.json", "old.json"]);
    }

    #[test]
    fn test_list_truncates_to_ten_most_recent() {
        let (_dir, store) = create_store();
        for i in 0..12u64 {
            let name = format!("f{i:02}");
            store.save(&json!(i), Some(name.as_str())).unwrap();
            // f11 最新，f00 最旧
            touch(&store, &format!("{name}.json"), 1000 - i * 10);
        }

        let listed = store.list_recent().unwrap();
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0].filename, "f11.json");
        assert_eq!(listed[9].filename, "f02.json");
        assert!(listed.iter().all(|e| e.filename != "f00.json" && e.filename != "f01.json"));
        assert!(listed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_list_limit_is_configurable() {
        let (dir, _) = create_store();
        let store = SnapshotStore::new(dir.path()).with_list_limit(2);
        for name in ["a", "b", "c"] {
            store.save(&json!(name), Some(name)).unwrap();
        }
        assert_eq!(store.list_recent().unwrap().len(), 2);
    }

    #[test]
    fn test_list_timestamp_is_iso8601() {
        let (_dir, store) = create_store();
        store.save(&json!(1), Some("t")).unwrap();

        let entry = &store.list_recent().unwrap()[0];
        assert_eq!(entry.timestamp.len(), "2024-05-01T10:20:30.123Z".len());
        assert!(entry.timestamp.ends_with('Z'));
        assert_eq!(&entry.timestamp[10..11], "T");
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let (dir, _) = create_store();
        let store = SnapshotStore::new(dir.path().join("missing"));
        assert!(matches!(store.list_recent(), Err(StoreError::Io(_))));
        assert!(matches!(store.save(&json!(1), Some("x")), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_restore_missing_is_not_found() {
        let (_dir, store) = create_store();
        assert!(matches!(store.restore("nope.json"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_restore_malformed_is_parse_error() {
        let (_dir, store) = create_store();
        fs::write(store.dir().join("bad.json"), "{\"a\":").unwrap();
        assert!(matches!(store.restore("bad.json"), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_contained_policy_rejects_traversal() {
        let (_dir, store) = create_store();
        for name in ["../secret.json", "a/b.json", "..", ".", "/etc/passwd", "a\\b.json", ""] {
            assert!(
                matches!(store.restore(name), Err(StoreError::InvalidInput(_))),
                "应拒绝文件名: {name}"
            );
        }
        assert!(matches!(
            store.save(&json!(1), Some("../escape")),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_verbatim_policy_allows_traversal() {
        let outer = TempDir::new().unwrap();
        let inner = outer.path().join("saved");
        fs::create_dir(&inner).unwrap();
        fs::write(outer.path().join("outside.json"), "[1,2]").unwrap();

        let store = SnapshotStore::new(&inner).with_policy(NamePolicy::Verbatim);
        assert_eq!(store.restore("../outside.json").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_verbatim_policy_keeps_leading_slash_inside_dir() {
        let (dir, _) = create_store();
        let store = SnapshotStore::new(dir.path()).with_policy(NamePolicy::Verbatim);
        assert_eq!(store.resolve("/x.json").unwrap(), dir.path().join("x.json"));
    }

    #[test]
    fn test_name_policy_from_str() {
        assert_eq!("contained".parse::<NamePolicy>().unwrap(), NamePolicy::Contained);
        assert_eq!("Verbatim".parse::<NamePolicy>().unwrap(), NamePolicy::Verbatim);
        assert!("loose".parse::<NamePolicy>().is_err());
    }
}
