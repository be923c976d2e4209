use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::forums::{load_topic_context, unauthorized};

pub async fn get_topic(
    service: &TopicService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    match load_topic_context(&storage, &user, topic_id).await {
        Ok((topic, _)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            topic,
            "Topic retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
