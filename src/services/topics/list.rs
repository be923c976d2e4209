use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::TopicListParams};
use crate::services::forums::{load_forum, unauthorized};
use crate::utils::access::is_admin;

pub async fn list_topics(
    service: &TopicService,
    query: TopicListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    match query.forum_id {
        Some(forum_id) => {
            if let Err(response) = load_forum(&storage, &user, forum_id).await {
                return Ok(response);
            }
        }
        // 只有管理员可以跨论坛列出主题
        None if !is_admin(user.role.as_ref()) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "forum_id is required",
            )));
        }
        None => {}
    }

    let (page, size) = query.pagination.resolve(10);
    match storage
        .list_topics_with_pagination(query.forum_id, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Topic list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve topics: {e}"),
            )),
        ),
    }
}
