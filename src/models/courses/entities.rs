use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程难度
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../bindings/course.ts")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl<'de> Deserialize<'de> for CourseLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CourseLevel>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课程难度: '{s}'. 支持: beginner, intermediate, advanced"
            ))
        })
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseLevel::Beginner => write!(f, "beginner"),
            CourseLevel::Intermediate => write!(f, "intermediate"),
            CourseLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for CourseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(CourseLevel::Beginner),
            "intermediate" => Ok(CourseLevel::Intermediate),
            "advanced" => Ok(CourseLevel::Advanced),
            _ => Err(format!("Invalid course level: {s}")),
        }
    }
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct Course {
    pub id: i64,
    pub category_id: i64,
    pub lecturer_id: i64,
    pub subject: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    /// 价格（整数货币单位），为空表示免费
    pub price: Option<i64>,
    pub level: CourseLevel,
    /// 时长（分钟）
    pub duration: i32,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.payable_amount() == 0
    }

    /// 需支付金额，免费课程为 0
    pub fn payable_amount(&self) -> i64 {
        self.price.unwrap_or(0).max(0)
    }
}
