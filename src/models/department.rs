use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 院系枚举
///
/// 搜索接口只接受这里列出的院系名称，"全部院系"用 `Option::None` 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// 计算机科学
    #[serde(rename = "Computer Science")]
    ComputerScience,
    /// 数学与统计
    #[serde(rename = "Mathematics")]
    Mathematics,
    /// 物理
    #[serde(rename = "Physics")]
    Physics,
    /// 化学
    #[serde(rename = "Chemistry")]
    Chemistry,
    /// 生命科学
    #[serde(rename = "Life Sciences")]
    LifeSciences,
    /// 经济
    #[serde(rename = "Economics")]
    Economics,
    /// 管理
    #[serde(rename = "Management Studies")]
    Management,
    /// 人文
    #[serde(rename = "Humanities")]
    Humanities,
    /// 社会科学
    #[serde(rename = "Social Sciences")]
    SocialSciences,
    /// 工程科学
    #[serde(rename = "Engineering Sciences")]
    Engineering,
}

/// 别名表（小写）→ 院系
static ALIASES: phf::Map<&'static str, Department> = phf_map! {
    "cs" => Department::ComputerScience,
    "cse" => Department::ComputerScience,
    "scis" => Department::ComputerScience,
    "computer science" => Department::ComputerScience,
    "ma" => Department::Mathematics,
    "maths" => Department::Mathematics,
    "mathematics" => Department::Mathematics,
    "ph" => Department::Physics,
    "physics" => Department::Physics,
    "cy" => Department::Chemistry,
    "chem" => Department::Chemistry,
    "chemistry" => Department::Chemistry,
    "ls" => Department::LifeSciences,
    "life sciences" => Department::LifeSciences,
    "ec" => Department::Economics,
    "eco" => Department::Economics,
    "economics" => Department::Economics,
    "ms" => Department::Management,
    "mba" => Department::Management,
    "management" => Department::Management,
    "management studies" => Department::Management,
    "hu" => Department::Humanities,
    "humanities" => Department::Humanities,
    "ss" => Department::SocialSciences,
    "social sciences" => Department::SocialSciences,
    "es" => Department::Engineering,
    "engineering" => Department::Engineering,
    "engineering sciences" => Department::Engineering,
};

impl Department {
    /// 所有院系（下拉列表顺序）
    pub const ALL: [Department; 10] = [
        Department::ComputerScience,
        Department::Mathematics,
        Department::Physics,
        Department::Chemistry,
        Department::LifeSciences,
        Department::Economics,
        Department::Management,
        Department::Humanities,
        Department::SocialSciences,
        Department::Engineering,
    ];

    /// 获取院系代码
    pub fn code(self) -> &'static str {
        match self {
            Department::ComputerScience => "CS",
            Department::Mathematics => "MA",
            Department::Physics => "PH",
            Department::Chemistry => "CY",
            Department::LifeSciences => "LS",
            Department::Economics => "EC",
            Department::Management => "MS",
            Department::Humanities => "HU",
            Department::SocialSciences => "SS",
            Department::Engineering => "ES",
        }
    }

    /// 获取标准名称（即接口中使用的值）
    pub fn name(self) -> &'static str {
        match self {
            Department::ComputerScience => "Computer Science",
            Department::Mathematics => "Mathematics",
            Department::Physics => "Physics",
            Department::Chemistry => "Chemistry",
            Department::LifeSciences => "Life Sciences",
            Department::Economics => "Economics",
            Department::Management => "Management Studies",
            Department::Humanities => "Humanities",
            Department::SocialSciences => "Social Sciences",
            Department::Engineering => "Engineering Sciences",
        }
    }

    /// 从名称、代码或别名解析院系（忽略大小写和首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        ALIASES.get(key.as_str()).copied()
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("未知院系: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_department_parses_from_name_and_code() {
        for dept in Department::ALL {
            assert_eq!(Department::parse(dept.name()), Some(dept));
            assert_eq!(Department::parse(dept.code()), Some(dept));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Department::parse("  CSE "), Some(Department::ComputerScience));
        assert_eq!(Department::parse("all"), None);
    }

    #[test]
    fn test_serializes_to_display_name() {
        let json = serde_json::to_string(&Department::Management).unwrap();
        assert_eq!(json, "\"Management Studies\"");
    }
}
