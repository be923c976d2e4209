use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程分类
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/category.ts")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
