use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ForumService, load_forum, unauthorized};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;

pub async fn get_forum(
    service: &ForumService,
    forum_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    match load_forum(&storage, &user, forum_id).await {
        Ok(forum) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            forum,
            "Forum retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
