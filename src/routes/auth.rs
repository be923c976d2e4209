use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{
    ForgetPasswordRequest, LoginRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn forget_password(
    req: HttpRequest,
    body: web::Json<ForgetPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.forget_password(body.into_inner(), &req).await
}

pub async fn verify_otp(
    req: HttpRequest,
    body: web::Json<VerifyOtpRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify_otp(body.into_inner(), &req).await
}

pub async fn reset_password(
    req: HttpRequest,
    body: web::Json<ResetPasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.reset_password(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route(
                "/login",
                web::post().to(login).wrap(middlewares::RateLimit::login()),
            )
            .route(
                "/refresh",
                web::post()
                    .to(refresh_token)
                    .wrap(middlewares::RateLimit::refresh_token()),
            )
            .route(
                "/forget-password",
                web::post()
                    .to(forget_password)
                    .wrap(middlewares::RateLimit::forget_password()),
            )
            .route(
                "/verify-otp",
                web::post()
                    .to(verify_otp)
                    .wrap(middlewares::RateLimit::forget_password().with_prefix("verify_otp")),
            )
            .route(
                "/reset-password",
                web::post()
                    .to(reset_password)
                    .wrap(middlewares::RateLimit::forget_password().with_prefix("reset_password")),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user)),
            ),
    );
}
