use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommentService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::forums::{load_forum, unauthorized};

pub async fn get_comment(
    service: &CommentService,
    comment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    let comment = match storage.get_comment_by_id(comment_id).await {
        Ok(Some(comment)) => comment,
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
    };

    if let Err(response) = load_forum(&storage, &user, comment.forum_id).await {
        return Ok(response);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        comment,
        "Comment retrieved successfully",
    )))
}
