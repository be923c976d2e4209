use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::CreateTopicRequest};
use crate::services::forums::{load_forum, unauthorized};

pub async fn create_topic(
    service: &TopicService,
    topic_data: CreateTopicRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    if topic_data.title.trim().is_empty() || topic_data.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Topic title and content are required",
        )));
    }

    let storage = service.get_storage(request);

    let forum = match load_forum(&storage, &user, topic_data.forum_id).await {
        Ok(forum) => forum,
        Err(response) => return Ok(response),
    };
    if forum.is_locked {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ForumLocked,
            "This forum is locked",
        )));
    }

    match storage.create_topic(user.id, topic_data).await {
        Ok(topic) => Ok(HttpResponse::Created().json(ApiResponse::success(
            topic,
            "Topic created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create topic: {e}"),
            )),
        ),
    }
}
