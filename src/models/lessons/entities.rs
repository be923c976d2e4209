use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课时
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct Lesson {
    pub id: i64,
    pub chapter_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// video / text / quiz 等，由前端解释
    pub lesson_type: String,
    pub video_url: Option<String>,
    /// 时长（秒）
    pub duration: i32,
    pub is_published: bool,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课时资料（外部 URL）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct Document {
    pub id: i64,
    pub lesson_id: i64,
    pub name: String,
    pub file_url: String,
    pub document_type: Option<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
