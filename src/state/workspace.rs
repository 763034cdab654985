//! 批次目录 + 选择集
//!
//! 两者必须一起更新：目录替换和选择集裁剪在同一个写锁内完成，
//! 外部永远看不到"新目录 + 旧选择集"的中间状态。

use crate::models::BatchCatalog;
use crate::state::{aggregate, Aggregate, SelectionSet};
use tracing::{debug, info};

/// 一次目录落地对选择集造成的影响
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogChange {
    /// 本次落地是否完成了选择集的首次初始化
    pub seeded: bool,
    /// 因为不在新目录中而被移出选择集的批次
    pub pruned: Vec<String>,
}

impl CatalogChange {
    pub fn selection_changed(&self) -> bool {
        self.seeded || !self.pruned.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    catalog: BatchCatalog,
    selection: SelectionSet,
    seeded: bool,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &BatchCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn aggregate(&self) -> Aggregate {
        aggregate(&self.catalog, &self.selection)
    }

    /// 替换目录
    ///
    /// 第一个非空目录用来初始化选择集，之后的目录只做裁剪
    pub fn apply_catalog(&mut self, catalog: BatchCatalog) -> CatalogChange {
        self.catalog = catalog;

        if !self.seeded {
            if self.catalog.is_empty() {
                debug!("目录为空，暂不初始化选择集");
                return CatalogChange::default();
            }
            self.selection = SelectionSet::initialize(&self.catalog);
            self.seeded = true;
            info!("✅ 默认选中批次: {:?}", self.selection.ids());
            return CatalogChange {
                seeded: true,
                pruned: Vec::new(),
            };
        }

        let pruned = self.selection.prune(&self.catalog);
        if !pruned.is_empty() {
            info!("🧹 以下批次已不在目录中，移出选择集: {:?}", pruned);
        }
        CatalogChange {
            seeded: false,
            pruned,
        }
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id, &self.catalog)
    }

    pub fn select_all(&mut self) -> bool {
        self.selection.select_all(&self.catalog)
    }

    pub fn deselect_all(&mut self) -> bool {
        self.selection.deselect_all()
    }

    /// 把选择集替换为给定批次（按给定顺序，忽略目录之外的批次）
    pub fn select_only(&mut self, ids: &[String]) -> bool {
        let next: SelectionSet = ids
            .iter()
            .filter(|id| self.catalog.contains(id))
            .cloned()
            .collect();
        let changed = next != self.selection;
        self.selection = next;
        changed
    }
}
