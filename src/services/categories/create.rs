use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CategoryService;
use crate::models::{ApiResponse, ErrorCode, categories::requests::CreateCategoryRequest};

pub async fn create_category(
    service: &CategoryService,
    category_data: CreateCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if category_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Category name is required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_category(category_data).await {
        Ok(category) => Ok(HttpResponse::Created().json(ApiResponse::success(
            category,
            "Category created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create category: {e}"),
            )),
        ),
    }
}
