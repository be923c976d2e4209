use super::entities::{CommentNode, Forum, Topic};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct ForumListResponse {
    pub items: Vec<Forum>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct TopicListResponse {
    pub items: Vec<Topic>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct CommentTreeResponse {
    pub items: Vec<CommentNode>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct ViewCountResponse {
    pub view_count: i64,
}
