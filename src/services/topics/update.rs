use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::UpdateTopicRequest};
use crate::services::forums::unauthorized;
use crate::utils::access::can_modify_post;

pub async fn update_topic(
    service: &TopicService,
    topic_id: i64,
    update_data: UpdateTopicRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&update_data.title) || blank(&update_data.content) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Topic title and content cannot be empty",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_topic_by_id(topic_id).await {
        Ok(Some(topic)) if can_modify_post(user.role.as_ref(), user.id, topic.user_id) => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only edit your own topics",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TopicNotFound,
                "Topic not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve topic: {e}"),
                )),
            );
        }
    }

    match storage.update_topic(topic_id, update_data).await {
        Ok(Some(topic)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            topic,
            "Topic updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TopicNotFound,
            "Topic not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update topic: {e}"),
            )),
        ),
    }
}
