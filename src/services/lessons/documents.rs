use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, ensure_lesson_manager};
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::{requests::CreateDocumentRequest, responses::DocumentListResponse},
};

pub async fn list_documents(
    service: &LessonService,
    lesson_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_lesson_by_id(lesson_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LessonNotFound,
                "Lesson not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve lesson: {e}"),
                )),
            );
        }
    }

    match storage.list_documents(lesson_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            DocumentListResponse { items },
            "Document list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve documents: {e}"),
            )),
        ),
    }
}

pub async fn create_document(
    service: &LessonService,
    lesson_id: i64,
    document_data: CreateDocumentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if document_data.name.trim().is_empty() || document_data.file_url.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Document name and file URL are required",
        )));
    }

    let storage = service.get_storage(request);

    if let Err(response) = ensure_lesson_manager(&storage, lesson_id, request).await {
        return Ok(response);
    }

    match storage.create_document(lesson_id, document_data).await {
        Ok(document) => Ok(HttpResponse::Created().json(ApiResponse::success(
            document,
            "Document created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create document: {e}"),
            )),
        ),
    }
}

pub async fn delete_document(
    service: &LessonService,
    lesson_id: i64,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) = ensure_lesson_manager(&storage, lesson_id, request).await {
        return Ok(response);
    }

    match storage.deactivate_document(lesson_id, document_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Document deactivated successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DocumentNotFound,
            "Document not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to deactivate document: {e}"),
            )),
        ),
    }
}
