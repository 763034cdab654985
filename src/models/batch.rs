use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 已处理的数据批次
///
/// 以文件名作为唯一标识，同名即同一批次
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 批次文件名
    pub id: String,
    /// 创建时间（无法解析时为 None）
    pub created_at: Option<NaiveDateTime>,
    /// 学生人数
    pub student_count: u64,
}

impl Batch {
    pub fn new(id: impl Into<String>, student_count: u64) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            student_count,
        }
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// 可读名称
    ///
    /// `academic_batch_2025-01-25.xlsx` → `2025-01-25`，不符合该格式时返回完整文件名
    pub fn display_name(&self) -> &str {
        batch_label_regex()
            .captures(&self.id)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
            .unwrap_or(&self.id)
    }
}

fn batch_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"batch_(.+)\.xlsx").expect("批次名称正则无效"))
}

/// 批次目录
///
/// 按后端返回顺序保存所有批次，外加一个可选的"当前批次"标记。
/// 不变式：`current_id` 存在时一定指向目录中的某个批次。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchCatalog {
    batches: Vec<Batch>,
    current_id: Option<String>,
}

impl BatchCatalog {
    /// 创建目录
    ///
    /// - 重复的批次只保留第一次出现的位置
    /// - `current_id` 不在目录中时被丢弃
    pub fn new(batches: Vec<Batch>, current_id: Option<String>) -> Self {
        let mut seen = HashSet::new();
        let batches: Vec<Batch> = batches
            .into_iter()
            .filter(|b| seen.insert(b.id.clone()))
            .collect();

        let current_id = current_id.filter(|id| seen.contains(id));

        Self {
            batches,
            current_id,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 所有批次（到达顺序）
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// 后端标记的当前批次
    pub fn current(&self) -> Option<&Batch> {
        self.current_id.as_deref().and_then(|id| self.get(id))
    }

    /// 最近的批次（到达顺序中的最后一个）
    pub fn most_recent(&self) -> Option<&Batch> {
        self.batches.last()
    }

    pub fn get(&self, id: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.batches.iter().map(|b| b.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
