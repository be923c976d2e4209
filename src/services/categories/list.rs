use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CategoryService;
use crate::models::{ApiResponse, ErrorCode, categories::responses::CategoryListResponse};

pub async fn list_categories(
    service: &CategoryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_categories().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CategoryListResponse { items },
            "Category list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve categories: {e}"),
            )),
        ),
    }
}
