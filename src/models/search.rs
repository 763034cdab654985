use crate::error::ValidationError;
use crate::models::department::Department;
use crate::models::lenient;
use serde::{Deserialize, Serialize};

/// CGPA 下限
pub const CGPA_FLOOR: f64 = 0.0;
/// CGPA 上限
pub const CGPA_CEILING: f64 = 10.0;

/// 学生搜索条件
///
/// 不变式：`min_cgpa <= max_cgpa`，且两者都在 `[0, 10]` 内。
/// 超出范围的值会被截断到边界；会破坏 `min <= max` 的修改直接拒绝，条件保持不变。
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    query: String,
    department: Option<Department>,
    min_cgpa: f64,
    max_cgpa: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            department: None,
            min_cgpa: CGPA_FLOOR,
            max_cgpa: CGPA_CEILING,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_department(mut self, department: Option<Department>) -> Self {
        self.department = department;
        self
    }

    /// 同时设置 CGPA 区间
    pub fn with_cgpa_range(mut self, min: f64, max: f64) -> Result<Self, ValidationError> {
        let (min, max) = (clamp_cgpa(min)?, clamp_cgpa(max)?);
        if min > max {
            return Err(ValidationError::InvalidCgpaRange { min, max });
        }
        self.min_cgpa = min;
        self.max_cgpa = max;
        Ok(self)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn department(&self) -> Option<Department> {
        self.department
    }

    pub fn min_cgpa(&self) -> f64 {
        self.min_cgpa
    }

    pub fn max_cgpa(&self) -> f64 {
        self.max_cgpa
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// `None` 表示全部院系
    pub fn set_department(&mut self, department: Option<Department>) {
        self.department = department;
    }

    /// 修改 CGPA 下限
    ///
    /// # 返回
    /// 截断后大于当前上限时返回错误，条件保持不变
    pub fn set_min_cgpa(&mut self, value: f64) -> Result<(), ValidationError> {
        let value = clamp_cgpa(value)?;
        if value > self.max_cgpa {
            return Err(ValidationError::InvalidCgpaRange {
                min: value,
                max: self.max_cgpa,
            });
        }
        self.min_cgpa = value;
        Ok(())
    }

    /// 修改 CGPA 上限
    pub fn set_max_cgpa(&mut self, value: f64) -> Result<(), ValidationError> {
        let value = clamp_cgpa(value)?;
        if value < self.min_cgpa {
            return Err(ValidationError::InvalidCgpaRange {
                min: self.min_cgpa,
                max: value,
            });
        }
        self.max_cgpa = value;
        Ok(())
    }

    /// 重新检查不变式
    pub fn validate(&self) -> Result<(), ValidationError> {
        let in_bounds = |v: f64| (CGPA_FLOOR..=CGPA_CEILING).contains(&v);
        if !in_bounds(self.min_cgpa) || !in_bounds(self.max_cgpa) || self.min_cgpa > self.max_cgpa {
            return Err(ValidationError::InvalidCgpaRange {
                min: self.min_cgpa,
                max: self.max_cgpa,
            });
        }
        Ok(())
    }

    /// 是否为完整区间 `[0, 10]`
    pub fn is_full_range(&self) -> bool {
        self.min_cgpa <= CGPA_FLOOR && self.max_cgpa >= CGPA_CEILING
    }

    /// 构建查询参数，只包含非默认字段
    ///
    /// - 空白的关键词不发送
    /// - 全部院系不发送 `department`
    /// - 完整区间不发送 `min_cgpa` / `max_cgpa`，否则两者都发送
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let query = self.query.trim();
        if !query.is_empty() {
            params.push(("query", query.to_string()));
        }

        if let Some(department) = self.department {
            params.push(("department", department.name().to_string()));
        }

        if !self.is_full_range() {
            params.push(("min_cgpa", format_cgpa(self.min_cgpa)));
            params.push(("max_cgpa", format_cgpa(self.max_cgpa)));
        }

        params
    }
}

fn clamp_cgpa(value: f64) -> Result<f64, ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::InvalidCgpaRange {
            min: value,
            max: value,
        });
    }
    Ok(value.clamp(CGPA_FLOOR, CGPA_CEILING))
}

/// 整数值保留一位小数（`6` → `6.0`），其余原样输出
fn format_cgpa(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// 学生搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub roll_number: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub cgpa: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub semester: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_default_criteria_sends_nothing() {
        assert!(FilterCriteria::default().query_params().is_empty());
        assert!(FilterCriteria::new().with_query("   ").query_params().is_empty());
    }

    #[test]
    fn test_range_without_department() {
        let criteria = FilterCriteria::new().with_cgpa_range(6.0, 8.0).unwrap();
        let params = criteria.query_params();

        assert_eq!(param(&params, "department"), None);
        assert_eq!(param(&params, "min_cgpa"), Some("6.0"));
        assert_eq!(param(&params, "max_cgpa"), Some("8.0"));
        assert_eq!(param(&params, "query"), None);
    }

    #[test]
    fn test_query_is_trimmed_and_department_sent_by_name() {
        let criteria = FilterCriteria::new()
            .with_query("  22MCMC05 ")
            .with_department(Some(Department::ComputerScience));
        let params = criteria.query_params();

        assert_eq!(param(&params, "query"), Some("22MCMC05"));
        assert_eq!(param(&params, "department"), Some("Computer Science"));
        assert_eq!(param(&params, "min_cgpa"), None);
    }

    #[test]
    fn test_out_of_bounds_edits_are_clamped() {
        let mut criteria = FilterCriteria::new();
        criteria.set_max_cgpa(12.5).unwrap();
        criteria.set_min_cgpa(-1.0).unwrap();
        assert_eq!(criteria.max_cgpa(), 10.0);
        assert_eq!(criteria.min_cgpa(), 0.0);
        assert!(criteria.is_full_range());
    }

    #[test]
    fn test_crossing_edit_is_rejected_and_criteria_unchanged() {
        let mut criteria = FilterCriteria::new().with_cgpa_range(6.0, 8.0).unwrap();

        let err = criteria.set_min_cgpa(9.0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidCgpaRange { min: 9.0, max: 8.0 });
        assert!(criteria.set_max_cgpa(5.5).is_err());
        assert!(criteria.set_min_cgpa(f64::NAN).is_err());

        assert_eq!((criteria.min_cgpa(), criteria.max_cgpa()), (6.0, 8.0));
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_with_cgpa_range_rejects_inverted_range() {
        assert!(FilterCriteria::new().with_cgpa_range(8.0, 6.0).is_err());
    }

    #[test]
    fn test_fractional_bounds_are_sent_verbatim() {
        let criteria = FilterCriteria::new().with_cgpa_range(6.25, 10.0).unwrap();
        let params = criteria.query_params();
        assert_eq!(param(&params, "min_cgpa"), Some("6.25"));
        assert_eq!(param(&params, "max_cgpa"), Some("10.0"));
    }

    #[test]
    fn test_student_record_tolerates_missing_fields() {
        let record: StudentRecord =
            serde_json::from_str(r#"{"name": "Asha", "cgpa": "9.1", "semester": 3}"#).unwrap();
        assert_eq!(record.name, "Asha");
        assert_eq!(record.cgpa, Some(9.1));
        assert_eq!(record.roll_number, "");
        assert_eq!(record.semester.as_deref(), Some("3"));
        assert!(record.email.is_none());
    }
}
