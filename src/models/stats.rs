use crate::models::lenient;
use serde::{Deserialize, Serialize};

/// 全量数据的看板统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub total_students: u64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub average_cgpa: f64,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub departments: Vec<DepartmentCount>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub cgpa_distribution: Vec<CgpaBucket>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub top_performers: Vec<TopPerformer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentCount {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub count: u64,
}

/// CGPA 分段，例如 `"8-9"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CgpaBucket {
    #[serde(default, deserialize_with = "lenient::string")]
    pub range: String,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub roll_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub cgpa: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_stats_payload() {
        let stats: DashboardStats = serde_json::from_str(
            r#"{
                "total_students": 120,
                "average_cgpa": "7.84",
                "departments": [{"name": "Physics", "count": 30}],
                "top_performers": [{"name": "Ravi", "cgpa": 9.7}]
            }"#,
        )
        .unwrap();

        assert_eq!(stats.total_students, 120);
        assert!((stats.average_cgpa - 7.84).abs() < f64::EPSILON);
        assert_eq!(stats.departments[0].count, 30);
        assert!(stats.cgpa_distribution.is_empty());
        assert_eq!(stats.top_performers[0].roll_number, "");
    }
}
