use super::entities::Chapter;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/chapter.ts")]
pub struct ChapterListResponse {
    pub items: Vec<Chapter>,
    pub pagination: PaginationInfo,
}
