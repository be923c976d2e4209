use super::entities::{Document, Lesson};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct LessonListResponse {
    pub items: Vec<Lesson>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/lesson.ts")]
pub struct DocumentListResponse {
    pub items: Vec<Document>,
}
