use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    AdminCreateUserRequest, RegisterRequest, UpdateCurrentUserRequest, UpdateUserRequest,
    UserListParams,
};
use crate::services::{AuthService, UserService};
use crate::utils::SafeIDI64;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

// HTTP处理程序
pub async fn register_student(
    req: HttpRequest,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .register(user_data.into_inner(), UserRole::Student, &req)
        .await
}

pub async fn register_teacher(
    req: HttpRequest,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .register(user_data.into_inner(), UserRole::Teacher, &req)
        .await
}

pub async fn get_current_user(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&req).await
}

pub async fn update_current_user(
    req: HttpRequest,
    update_data: web::Json<UpdateCurrentUserRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .update_current_user(update_data.into_inner(), &req)
        .await
}

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<AdminCreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

pub async fn list_teachers(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_teachers(&req).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    // 公开的讲师列表
    cfg.route("/api/v1/teachers", web::get().to(list_teachers));

    cfg.service(
        web::scope("/api/v1/users")
            .route(
                "/register-student",
                web::post()
                    .to(register_student)
                    .wrap(middlewares::RateLimit::register()),
            )
            .route(
                "/register-teacher",
                web::post()
                    .to(register_teacher)
                    .wrap(middlewares::RateLimit::register()),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    // 必须先于 /{id} 注册
                    .service(
                        web::resource("/current-user")
                            .route(web::get().to(get_current_user))
                            .route(web::patch().to(update_current_user)),
                    )
                    .service(
                        web::resource("")
                            .route(
                                web::get()
                                    .to(list_users)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            )
                            .route(
                                web::post()
                                    .to(create_user)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            ),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(
                                web::get()
                                    .to(get_user)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            )
                            .route(
                                web::put()
                                    .to(update_user)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            )
                            .route(
                                web::delete()
                                    .to(delete_user)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            ),
                    ),
            ),
    );
}
