use crate::models::BatchCatalog;
use crate::state::SelectionSet;

/// 选择集的汇总信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// 选中批次的学生总数
    pub total_students: u64,
    /// 选中批次数
    pub batch_count: usize,
}

/// 计算选择集汇总
///
/// 纯函数，每次都从目录和选择集重新计算，不做缓存。
/// 不在目录中的批次不计入（选择集满足不变式时 `batch_count == selection.len()`）。
/// 学生数来自后端，求和在 `u64::MAX` 处饱和。
pub fn aggregate(catalog: &BatchCatalog, selection: &SelectionSet) -> Aggregate {
    selection
        .ids()
        .iter()
        .filter_map(|id| catalog.get(id))
        .fold(Aggregate::default(), |acc, batch| Aggregate {
            total_students: acc.total_students.saturating_add(batch.student_count),
            batch_count: acc.batch_count + 1,
        })
}
