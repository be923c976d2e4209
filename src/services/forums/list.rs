use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ForumService, unauthorized};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::ForumListParams};
use crate::storage::ForumScope;
use crate::utils::access::{is_admin, is_teacher};

pub async fn list_forums(
    service: &ForumService,
    query: ForumListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let role = user.role.as_ref();
    let scope = if is_admin(role) {
        ForumScope::All
    } else if is_teacher(role) {
        ForumScope::CreatedBy(user.id)
    } else {
        ForumScope::EnrolledBy(user.id)
    };

    let storage = service.get_storage(request);
    let (page, size) = query.pagination.resolve(10);

    match storage.list_forums_with_pagination(scope, page, size).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Forum list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve forums: {e}"),
            )),
        ),
    }
}
