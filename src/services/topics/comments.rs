use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, common::PaginationQuery};
use crate::services::comments::paged_comment_tree;
use crate::services::forums::{load_topic_context, unauthorized};

pub async fn list_topic_comments(
    service: &TopicService,
    topic_id: i64,
    query: PaginationQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    if let Err(response) = load_topic_context(&storage, &user, topic_id).await {
        return Ok(response);
    }

    match paged_comment_tree(&storage, topic_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Comments retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
