pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod replies;
pub mod tree;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::common::{PaginationInfo, PaginationQuery};
use crate::models::forums::entities::CommentNode;
use crate::models::forums::requests::{
    CommentListParams, CreateCommentRequest, UpdateCommentRequest,
};
use crate::models::forums::responses::CommentTreeResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 顶层评论默认页大小
pub const DEFAULT_COMMENT_PAGE_SIZE: u64 = 10;

pub struct CommentService {
    storage: Option<Arc<dyn Storage>>,
}

impl CommentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_comments(
        &self,
        query: CommentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_comments(self, query, request).await
    }

    pub async fn get_comment(
        &self,
        comment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_comment(self, comment_id, request).await
    }

    // 写入评论后向主题订阅者推送
    pub async fn create_comment(
        &self,
        comment_data: CreateCommentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_comment(self, comment_data, request).await
    }

    pub async fn update_comment(
        &self,
        comment_id: i64,
        update_data: UpdateCommentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_comment(self, comment_id, update_data, request).await
    }

    pub async fn delete_comment(
        &self,
        comment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_comment(self, comment_id, request).await
    }

    pub async fn list_replies(
        &self,
        comment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        replies::list_replies(self, comment_id, request).await
    }
}

pub(crate) fn max_reply_depth() -> usize {
    AppConfig::get().forum.max_reply_depth
}

/// 主题评论树，按顶层评论分页
pub(crate) async fn paged_comment_tree(
    storage: &Arc<dyn Storage>,
    topic_id: i64,
    query: &PaginationQuery,
) -> Result<CommentTreeResponse, HttpResponse> {
    let comments = storage.list_topic_comments(topic_id).await.map_err(|e| {
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            format!("Failed to retrieve comments: {e}"),
        ))
    })?;

    let (page, size) = query.resolve(DEFAULT_COMMENT_PAGE_SIZE);
    Ok(paginate_forest(
        tree::build_comment_forest(comments, max_reply_depth()),
        page,
        size,
    ))
}

fn paginate_forest(
    forest: Vec<CommentNode>,
    page: u64,
    size: u64,
) -> CommentTreeResponse {
    let total = forest.len() as u64;
    let pages = total.div_ceil(size);
    let items = forest
        .into_iter()
        .skip(((page - 1) * size) as usize)
        .take(size as usize)
        .collect();
    CommentTreeResponse {
        items,
        pagination: PaginationInfo::new(page, size, total, pages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forums::entities::Comment;
    use chrono::Utc;

    fn root(id: i64) -> CommentNode {
        CommentNode::leaf(Comment {
            id,
            user_id: 1,
            forum_id: 1,
            topic_id: Some(1),
            parent_id: None,
            content: "root".into(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_paginate_forest() {
        let forest: Vec<CommentNode> = (1..=5).map(root).collect();
        let response = paginate_forest(forest, 2, 2);
        assert_eq!(
            response.items.iter().map(|n| n.comment.id).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(response.pagination.total, 5);
        assert_eq!(response.pagination.total_pages, 3);

        let empty = paginate_forest(Vec::new(), 1, 10);
        assert!(empty.items.is_empty());
        assert_eq!(empty.pagination.total_pages, 0);
    }
}
