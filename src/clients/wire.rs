//! 后端接口的原始响应结构
//!
//! 所有字段都有默认值，解析后再映射成 `models` 中的领域类型。

use crate::models::lenient;
use crate::models::{Alert, AlertKind, Batch, BatchCatalog, ContextStats, Severity, StudentRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// `GET batches/all`
#[derive(Debug, Default, Deserialize)]
pub struct BatchesResponse {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub batches: Vec<BatchDto>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub current_batch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchDto {
    #[serde(default, deserialize_with = "lenient::string")]
    pub filename: String,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, alias = "record_count", deserialize_with = "lenient::u64_or_zero")]
    pub student_count: u64,
}

impl BatchesResponse {
    /// 没有文件名的批次无法被选中，直接丢弃
    pub fn into_catalog(self) -> BatchCatalog {
        let batches = self
            .batches
            .into_iter()
            .filter(|b| !b.filename.trim().is_empty())
            .map(|b| {
                let batch = Batch::new(b.filename, b.student_count);
                match b.created_at {
                    Some(at) => batch.with_created_at(at),
                    None => batch,
                }
            })
            .collect();
        BatchCatalog::new(batches, self.current_batch)
    }
}

/// `POST ai/query` 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub batches: Vec<String>,
}

/// `POST ai/query` 响应
#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub context_stats: Option<ContextStatsDto>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub batch_used: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub provider: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContextStatsDto {
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub total_students: u64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub avg_cgpa: f64,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub departments: u64,
}

/// AI 查询结果（已映射）
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub response: String,
    pub context_stats: Option<ContextStats>,
    pub batch_used: Option<String>,
    pub model: Option<String>,
    pub provider: Option<String>,
}

/// 后端没有返回回答文本时的占位内容
pub const NO_RESPONSE_TEXT: &str = "No response received";

impl From<QueryResponse> for QueryAnswer {
    fn from(raw: QueryResponse) -> Self {
        Self {
            response: raw.response.unwrap_or_else(|| NO_RESPONSE_TEXT.to_string()),
            context_stats: raw.context_stats.map(|c| ContextStats {
                total_students: c.total_students,
                avg_cgpa: c.avg_cgpa,
                departments: c.departments,
            }),
            batch_used: raw.batch_used,
            model: raw.model,
            provider: raw.provider,
        }
    }
}

/// `GET dashboard/alerts`
#[derive(Debug, Default, Deserialize)]
pub struct AlertsResponse {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub alerts: Vec<AlertDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertDto {
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub severity: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub action: String,
}

impl From<AlertDto> for Alert {
    fn from(raw: AlertDto) -> Self {
        Self {
            kind: AlertKind::from_wire(&raw.kind),
            severity: Severity::from_wire(&raw.severity),
            title: raw.title,
            description: raw.description,
            details: raw.details,
            count: raw.count,
            action: raw.action,
        }
    }
}

/// `GET search/students`
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub results: Vec<StudentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_response_maps_to_catalog() {
        let raw: BatchesResponse = serde_json::from_str(
            r#"{
                "batches": [
                    {"filename": "academic_batch_2025-01-20.xlsx", "created_at": "2025-01-20T09:00:00.5", "student_count": 10},
                    {"filename": "", "student_count": 3},
                    {"filename": "academic_batch_2025-01-25.xlsx", "record_count": "5"}
                ],
                "current_batch": "academic_batch_2025-01-25.xlsx"
            }"#,
        )
        .unwrap();

        let catalog = raw.into_catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.current_id(), Some("academic_batch_2025-01-25.xlsx"));
        assert_eq!(catalog.batches()[1].student_count, 5);
        assert!(catalog.batches()[0].created_at.is_some());
    }

    #[test]
    fn test_query_response_defaults() {
        let raw: QueryResponse = serde_json::from_str(r#"{"context_stats": "oops"}"#).unwrap();
        let answer = QueryAnswer::from(raw);
        assert_eq!(answer.response, NO_RESPONSE_TEXT);
        assert!(answer.context_stats.is_none());
    }

    #[test]
    fn test_query_response_with_provenance() {
        let raw: QueryResponse = serde_json::from_str(
            r#"{
                "response": "The average CGPA is 7.9",
                "context_stats": {"total_students": 42, "avg_cgpa": 7.9, "departments": 4},
                "provider": "cohere",
                "model": "command-a"
            }"#,
        )
        .unwrap();
        let answer = QueryAnswer::from(raw);
        assert_eq!(answer.context_stats.map(|c| c.total_students), Some(42));
        assert_eq!(answer.provider.as_deref(), Some("cohere"));
        assert!(answer.batch_used.is_none());
    }

    #[test]
    fn test_alert_dto_maps_enums() {
        let raw: AlertsResponse = serde_json::from_str(
            r#"{"alerts": [{"type": "warning", "severity": "high", "title": "Low CGPA",
                "description": "3 students below 6.0", "count": 3, "action": "Schedule counselling"},
                {"type": "celebration", "severity": "urgent"}]}"#,
        )
        .unwrap();

        let alerts: Vec<Alert> = raw.alerts.into_iter().map(Alert::from).collect();
        assert_eq!(alerts[0].kind, AlertKind::Warning);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].count, 3);
        assert_eq!(alerts[1].kind, AlertKind::Other);
        assert_eq!(alerts[1].severity, Severity::Other);
    }
}
