use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/chapter.ts")]
pub struct ChapterListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/chapter.ts")]
pub struct CreateChapterRequest {
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/chapter.ts")]
pub struct UpdateChapterRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
}
