use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CommentService, paged_comment_tree};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::CommentListParams};
use crate::services::forums::{load_topic_context, unauthorized};

pub async fn list_comments(
    service: &CommentService,
    query: CommentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let Some(topic_id) = query.topic_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "topic_id is required",
        )));
    };

    let storage = service.get_storage(request);

    if let Err(response) = load_topic_context(&storage, &user, topic_id).await {
        return Ok(response);
    }

    match paged_comment_tree(&storage, topic_id, &query.pagination).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Comments retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
