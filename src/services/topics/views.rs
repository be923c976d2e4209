use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TopicService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::responses::ViewCountResponse};
use crate::services::forums::{load_topic_context, unauthorized};

pub async fn increment_view(
    service: &TopicService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    if let Err(response) = load_topic_context(&storage, &user, topic_id).await {
        return Ok(response);
    }

    match storage.increment_topic_view(topic_id).await {
        Ok(Some(view_count)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ViewCountResponse { view_count },
            "View count updated",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TopicNotFound,
            "Topic not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update view count: {e}"),
            )),
        ),
    }
}
