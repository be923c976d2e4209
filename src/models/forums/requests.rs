use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct ForumListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct CreateForumRequest {
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct TopicListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub forum_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct CreateTopicRequest {
    pub forum_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct UpdateTopicRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_locked: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct CommentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub topic_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct CreateCommentRequest {
    pub topic_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/forum.ts")]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// 存储层写入评论所需字段
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub forum_id: i64,
    pub topic_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
}
