use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommentService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::UpdateCommentRequest};
use crate::services::forums::unauthorized;
use crate::utils::access::can_modify_post;

pub async fn update_comment(
    service: &CommentService,
    comment_id: i64,
    update_data: UpdateCommentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    if update_data.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Comment content is required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_comment_by_id(comment_id).await {
        Ok(Some(comment)) if can_modify_post(user.role.as_ref(), user.id, comment.user_id) => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only edit your own comments",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CommentNotFound,
                "Comment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve comment: {e}"),
                )),
            );
        }
    }

    match storage.update_comment(comment_id, update_data.content).await {
        Ok(Some(comment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            comment,
            "Comment updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CommentNotFound,
            "Comment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update comment: {e}"),
            )),
        ),
    }
}
