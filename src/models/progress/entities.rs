use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 达到该完成度即视为课时完成
pub const LESSON_COMPLETION_THRESHOLD: f64 = 90.0;

// 课时学习状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../bindings/progress.ts")]
pub enum LessonProgressStatus {
    NotStarted,
    InProgress,
    Completed,
    Paused,
}

impl LessonProgressStatus {
    pub const NOT_STARTED: &'static str = "NOT_STARTED";
    pub const IN_PROGRESS: &'static str = "IN_PROGRESS";
    pub const COMPLETED: &'static str = "COMPLETED";
    pub const PAUSED: &'static str = "PAUSED";

    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= LESSON_COMPLETION_THRESHOLD {
            Self::Completed
        } else if percentage > 0.0 {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }

    /// 已经开始学习（用于首次写入 started_at）
    pub fn is_started(&self) -> bool {
        !matches!(self, Self::NotStarted)
    }
}

impl<'de> Deserialize<'de> for LessonProgressStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<LessonProgressStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的学习状态: '{s}'. 支持的状态: NOT_STARTED, IN_PROGRESS, COMPLETED, PAUSED"
            ))
        })
    }
}

impl std::fmt::Display for LessonProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LessonProgressStatus::NotStarted => Self::NOT_STARTED,
            LessonProgressStatus::InProgress => Self::IN_PROGRESS,
            LessonProgressStatus::Completed => Self::COMPLETED,
            LessonProgressStatus::Paused => Self::PAUSED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for LessonProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::NOT_STARTED => Ok(LessonProgressStatus::NotStarted),
            Self::IN_PROGRESS => Ok(LessonProgressStatus::InProgress),
            Self::COMPLETED => Ok(LessonProgressStatus::Completed),
            Self::PAUSED => Ok(LessonProgressStatus::Paused),
            _ => Err(format!("Invalid lesson progress status: {s}")),
        }
    }
}

// 课时进度
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/progress.ts")]
pub struct LessonProgress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub status: LessonProgressStatus,
    /// 观看时长（秒）
    pub watch_time: i64,
    pub completion_percentage: f64,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_watched_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程进度（由课时进度汇总）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/progress.ts")]
pub struct CourseProgress {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub total_watch_time: i64,
    pub completion_percentage: f64,
    pub last_accessed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 汇总结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseProgressSummary {
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub total_watch_time: i64,
    pub completion_percentage: f64,
}

impl CourseProgressSummary {
    pub fn compute(total_lessons: i64, completed_lessons: i64, total_watch_time: i64) -> Self {
        let completion_percentage = if total_lessons > 0 {
            100.0 * completed_lessons as f64 / total_lessons as f64
        } else {
            0.0
        };
        Self {
            total_lessons,
            completed_lessons,
            total_watch_time,
            completion_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_percentage() {
        assert_eq!(
            LessonProgressStatus::from_percentage(0.0),
            LessonProgressStatus::NotStarted
        );
        assert_eq!(
            LessonProgressStatus::from_percentage(0.5),
            LessonProgressStatus::InProgress
        );
        assert_eq!(
            LessonProgressStatus::from_percentage(89.99),
            LessonProgressStatus::InProgress
        );
        assert_eq!(
            LessonProgressStatus::from_percentage(90.0),
            LessonProgressStatus::Completed
        );
        assert_eq!(
            LessonProgressStatus::from_percentage(100.0),
            LessonProgressStatus::Completed
        );
    }

    #[test]
    fn test_summary_percentage() {
        let summary = CourseProgressSummary::compute(3, 2, 120);
        assert!((summary.completion_percentage - 66.666_666).abs() < 0.001);
        assert_eq!(summary.total_watch_time, 120);

        let empty = CourseProgressSummary::compute(0, 0, 0);
        assert_eq!(empty.completion_percentage, 0.0);

        let full = CourseProgressSummary::compute(4, 4, 10);
        assert_eq!(full.completion_percentage, 100.0);
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&LessonProgressStatus::NotStarted).unwrap(),
            "\"NOT_STARTED\""
        );
        let status: LessonProgressStatus = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(status, LessonProgressStatus::Paused);
    }
}
