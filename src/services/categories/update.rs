use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CategoryService;
use crate::models::{ApiResponse, ErrorCode, categories::requests::UpdateCategoryRequest};

pub async fn update_category(
    service: &CategoryService,
    category_id: i64,
    update_data: UpdateCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update_data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Category name cannot be empty",
        )));
    }

    let storage = service.get_storage(request);

    match storage.update_category(category_id, update_data).await {
        Ok(Some(category)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            category,
            "Category updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CategoryNotFound,
            "Category not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update category: {e}"),
            )),
        ),
    }
}
