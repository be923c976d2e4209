use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, Route, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::chapters::requests::{
    ChapterListParams, CreateChapterRequest, UpdateChapterRequest,
};
use crate::models::courses::requests::{
    CourseListParams, CreateCourseRequest, UpdateCourseRequest,
};
use crate::models::lessons::requests::{
    CreateDocumentRequest, CreateLessonRequest, LessonListParams, UpdateLessonRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{CategoryService, ChapterService, CourseService, LessonService};
use crate::utils::{SafeDocumentIdI64, SafeIDI64};

// 懒加载的全局服务实例
static CATEGORY_SERVICE: Lazy<CategoryService> = Lazy::new(CategoryService::new_lazy);
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static CHAPTER_SERVICE: Lazy<ChapterService> = Lazy::new(ChapterService::new_lazy);
static LESSON_SERVICE: Lazy<LessonService> = Lazy::new(LessonService::new_lazy);

// 分类
pub async fn list_categories(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE.list_categories(&req).await
}

pub async fn create_category(
    req: HttpRequest,
    category_data: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE
        .create_category(category_data.into_inner(), &req)
        .await
}

pub async fn update_category(
    req: HttpRequest,
    category_id: SafeIDI64,
    update_data: web::Json<UpdateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE
        .update_category(category_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_category(req: HttpRequest, category_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE.delete_category(category_id.0, &req).await
}

// 课程
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn list_top_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_top_courses(&req).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.0, &req).await
}

pub async fn get_course_detail(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course_detail(course_id.0, &req).await
}

pub async fn get_course_forum(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course_forum(course_id.0, &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(course_data.into_inner(), &req)
        .await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeIDI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(course_id.0, &req).await
}

// 章节
pub async fn list_chapters(
    req: HttpRequest,
    query: web::Query<ChapterListParams>,
) -> ActixResult<HttpResponse> {
    CHAPTER_SERVICE.list_chapters(query.into_inner(), &req).await
}

pub async fn get_chapter(req: HttpRequest, chapter_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CHAPTER_SERVICE.get_chapter(chapter_id.0, &req).await
}

pub async fn create_chapter(
    req: HttpRequest,
    chapter_data: web::Json<CreateChapterRequest>,
) -> ActixResult<HttpResponse> {
    CHAPTER_SERVICE
        .create_chapter(chapter_data.into_inner(), &req)
        .await
}

pub async fn update_chapter(
    req: HttpRequest,
    chapter_id: SafeIDI64,
    update_data: web::Json<UpdateChapterRequest>,
) -> ActixResult<HttpResponse> {
    CHAPTER_SERVICE
        .update_chapter(chapter_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_chapter(req: HttpRequest, chapter_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CHAPTER_SERVICE.delete_chapter(chapter_id.0, &req).await
}

// 课时与资料
pub async fn list_lessons(
    req: HttpRequest,
    query: web::Query<LessonListParams>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.list_lessons(query.into_inner(), &req).await
}

pub async fn get_lesson(req: HttpRequest, lesson_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.get_lesson(lesson_id.0, &req).await
}

pub async fn create_lesson(
    req: HttpRequest,
    lesson_data: web::Json<CreateLessonRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .create_lesson(lesson_data.into_inner(), &req)
        .await
}

pub async fn update_lesson(
    req: HttpRequest,
    lesson_id: SafeIDI64,
    update_data: web::Json<UpdateLessonRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .update_lesson(lesson_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_lesson(req: HttpRequest, lesson_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.delete_lesson(lesson_id.0, &req).await
}

pub async fn list_documents(req: HttpRequest, lesson_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.list_documents(lesson_id.0, &req).await
}

pub async fn create_document(
    req: HttpRequest,
    lesson_id: SafeIDI64,
    document_data: web::Json<CreateDocumentRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .create_document(lesson_id.0, document_data.into_inner(), &req)
        .await
}

pub async fn delete_document(
    req: HttpRequest,
    lesson_id: SafeIDI64,
    document_id: SafeDocumentIdI64,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .delete_document(lesson_id.0, document_id.0, &req)
        .await
}

// 写操作：先 JWT 再校验讲师/管理员角色（后 wrap 的先执行）
fn teacher_only(route: Route) -> Route {
    route
        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
        .wrap(middlewares::RequireJWT)
}

// 配置路由
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/categories")
            .service(
                web::resource("")
                    .route(web::get().to(list_categories))
                    .route(teacher_only(web::post().to(create_category))),
            )
            .service(
                web::resource("/{id}")
                    .route(teacher_only(web::put().to(update_category)))
                    .route(teacher_only(web::delete().to(delete_category))),
            ),
    );

    cfg.service(
        web::scope("/api/v1/courses")
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    .route(teacher_only(web::post().to(create_course))),
            )
            // 必须先于 /{id} 注册
            .route("/top", web::get().to(list_top_courses))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(teacher_only(web::put().to(update_course)))
                    .route(teacher_only(web::delete().to(delete_course))),
            )
            .route("/{id}/detail", web::get().to(get_course_detail))
            .route(
                "/{id}/forum",
                web::get()
                    .to(get_course_forum)
                    .wrap(middlewares::RequireJWT),
            ),
    );

    cfg.service(
        web::scope("/api/v1/chapters")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_chapters))
                    .route(
                        web::post()
                            .to(create_chapter)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_chapter))
                    .route(
                        web::put()
                            .to(update_chapter)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_chapter)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/lessons")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_lessons))
                    .route(
                        web::post()
                            .to(create_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_lesson))
                    .route(
                        web::put()
                            .to(update_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/documents")
                    .route(web::get().to(list_documents))
                    .route(
                        web::post()
                            .to(create_document)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .route(
                "/{id}/documents/{document_id}",
                web::delete()
                    .to(delete_document)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}
