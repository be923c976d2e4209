use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    forums::requests::{CreateCommentRequest, NewComment},
};
use crate::services::forums::{load_topic_context, unauthorized};
use crate::services::websocket::broadcast_new_comment;

pub async fn create_comment(
    service: &CommentService,
    comment_data: CreateCommentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    if comment_data.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Comment content is required",
        )));
    }

    let storage = service.get_storage(request);

    let (topic, forum) = match load_topic_context(&storage, &user, comment_data.topic_id).await {
        Ok(context) => context,
        Err(response) => return Ok(response),
    };
    if forum.is_locked {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ForumLocked,
            "This forum is locked",
        )));
    }
    if topic.is_locked {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::TopicLocked,
            "This topic is locked",
        )));
    }

    // 父评论必须属于同一主题
    if let Some(parent_id) = comment_data.parent_id {
        match storage.get_comment_by_id(parent_id).await {
            Ok(Some(parent)) if parent.topic_id == Some(topic.id) => {}
            Ok(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CommentParentInvalid,
                    "Parent comment does not belong to this topic",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to retrieve parent comment: {e}"),
                    )),
                );
            }
        }
    }

    let comment = match storage
        .create_comment(NewComment {
            user_id: user.id,
            forum_id: forum.id,
            topic_id: topic.id,
            parent_id: comment_data.parent_id,
            content: comment_data.content,
        })
        .await
    {
        Ok(comment) => comment,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create comment: {e}"),
                )),
            );
        }
    };

    broadcast_new_comment(topic.id, &comment, user.display_name());

    Ok(HttpResponse::Created().json(ApiResponse::success(
        comment,
        "Comment created successfully",
    )))
}
