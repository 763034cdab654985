//! 批次选择集
//!
//! 有序集合：插入顺序可见，也是发给后端的 `batches` 顺序。
//! 不变式：每个操作之后选择集都是当前目录的子集。

use crate::models::BatchCatalog;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据目录初始化默认选择
    ///
    /// - 有当前批次：只选当前批次
    /// - 否则目录非空：选到达顺序中的最后一个
    /// - 否则为空
    pub fn initialize(catalog: &BatchCatalog) -> Self {
        let ids = catalog
            .current()
            .or_else(|| catalog.most_recent())
            .map(|b| vec![b.id.clone()])
            .unwrap_or_default();

        let selection = Self { ids };
        selection.debug_check(catalog);
        selection
    }

    /// 切换某个批次的选中状态
    ///
    /// 不在目录中的批次不做任何处理
    ///
    /// # 返回
    /// 选择集是否发生变化
    pub fn toggle(&mut self, id: &str, catalog: &BatchCatalog) -> bool {
        if !catalog.contains(id) {
            return false;
        }

        match self.ids.iter().position(|x| x == id) {
            Some(pos) => {
                self.ids.remove(pos);
            }
            None => self.ids.push(id.to_string()),
        }

        self.debug_check(catalog);
        true
    }

    /// 选中目录中的全部批次（目录顺序）
    ///
    /// # 返回
    /// 选择集是否发生变化
    pub fn select_all(&mut self, catalog: &BatchCatalog) -> bool {
        let all: Vec<String> = catalog.ids().map(str::to_string).collect();
        let changed = all != self.ids;
        self.ids = all;
        self.debug_check(catalog);
        changed
    }

    /// 清空选择
    ///
    /// # 返回
    /// 选择集是否发生变化
    pub fn deselect_all(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// 移除已不在目录中的批次，剩余批次保持相对顺序
    ///
    /// # 返回
    /// 被移除的批次
    pub fn prune(&mut self, catalog: &BatchCatalog) -> Vec<String> {
        let (kept, removed): (Vec<String>, Vec<String>) =
            self.ids.drain(..).partition(|id| catalog.contains(id));
        self.ids = kept;
        self.debug_check(catalog);
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    /// 选中的批次（选择顺序）
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 是否为目录的子集
    pub fn is_subset_of(&self, catalog: &BatchCatalog) -> bool {
        self.ids.iter().all(|id| catalog.contains(id))
    }

    fn debug_check(&self, catalog: &BatchCatalog) {
        debug_assert!(self.is_subset_of(catalog), "选择集包含目录之外的批次");
    }
}

impl FromIterator<String> for SelectionSet {
    /// 重复的 id 只保留第一次出现
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for id in iter {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }
}
