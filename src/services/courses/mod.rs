pub mod create;
pub mod delete;
pub mod detail;
pub mod forum;
pub mod get;
pub mod list;
pub mod top;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::courses::entities::Course;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::access::can_manage_course;

/// 课程列表默认页大小
pub const DEFAULT_COURSE_PAGE_SIZE: u64 = 8;
/// 热门课程数量
pub const TOP_COURSE_LIMIT: usize = 3;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn list_top_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        top::list_top_courses(self, request).await
    }

    pub async fn get_course(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    // 课程详情：讲师 + 章节 + 课时 + 资料
    pub async fn get_course_detail(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_course_detail(self, course_id, request).await
    }

    pub async fn get_course_forum(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        forum::get_course_forum(self, course_id, request).await
    }

    pub async fn create_course(
        &self,
        course_data: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, course_data, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_data: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update_data, request).await
    }

    // 停用课程
    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }
}

/// 加载课程并校验当前用户可管理该课程（管理员或课程讲师）
///
/// 章节、课时、资料的写操作共用此校验。
pub(crate) async fn ensure_course_manager(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    request: &HttpRequest,
) -> Result<Course, HttpResponse> {
    let user = RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })?;

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load course: {e}"),
                )),
            );
        }
    };

    if !can_manage_course(user.role.as_ref(), user.id, &course) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to manage this course",
        )));
    }

    Ok(course)
}

/// 分类须存在且有效
pub(crate) async fn ensure_category_exists(
    storage: &Arc<dyn Storage>,
    category_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_category_by_id(category_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CategoryNotFound,
            "Category not found",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load category: {e}"),
            )),
        ),
    }
}

pub(crate) fn validate_price(price: Option<i64>) -> Result<(), HttpResponse> {
    if price.is_some_and(|p| p < 0) {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Price cannot be negative",
        )));
    }
    Ok(())
}
