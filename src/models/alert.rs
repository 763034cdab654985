/// 预警类型
///
/// 未知的类型字符串统一落到 `Other`，显示时使用默认样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Warning,
    Success,
    Info,
    Other,
}

impl AlertKind {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "warning" => AlertKind::Warning,
            "success" => AlertKind::Success,
            "info" => AlertKind::Info,
            _ => AlertKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Warning => "warning",
            AlertKind::Success => "success",
            AlertKind::Info => "info",
            AlertKind::Other => "other",
        }
    }
}

/// 预警严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    High,
    Medium,
    Low,
    Other,
}

impl Severity {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Other => "other",
        }
    }

    /// 排序用的级别，数值越大越严重；未知程度按 low 处理
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low | Severity::Other => 1,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// 学业预警
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub details: Option<String>,
    /// 涉及的学生数
    pub count: u64,
    /// 建议采取的措施
    pub action: String,
}
