use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct LessonListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub chapter_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct CreateLessonRequest {
    pub chapter_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub lesson_type: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct UpdateLessonRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lesson_type: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct CreateDocumentRequest {
    pub name: String,
    pub file_url: String,
    pub document_type: Option<String>,
}
