/*!
 * 基于角色的访问控制中间件
 *
 * 必须位于 RequireJWT 之内（即先 wrap RequireRole，再 wrap RequireJWT），
 * 读取 RequireJWT 写入请求扩展的当前用户，按角色白名单放行。
 *
 * ```rust,ignore
 * web::scope("/api/v1/roles")
 *     .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *     .wrap(RequireJWT)
 * ```
 *
 * 每个用户只有一个角色；角色行被删除后用户没有角色，任何角色门槛都会拒绝。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 持有任一列出角色即可通过
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(allowed: &[UserRole], role: Option<&UserRole>) -> bool {
        role.is_some_and(|role| allowed.contains(role))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let caller = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            let Some((user_id, role)) = caller else {
                info!("Role check reached without an authenticated user");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if RequireRole::permits(&allowed, role.as_ref()) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "Access denied for user {} (role: {:?}), allowed: {:?}",
                user_id, role, allowed
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "You do not have permission to perform this action",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserStatus};
    use actix_web::{App, HttpResponse, test as actix_test, web};

    fn user_with(role: Option<UserRole>) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            role_id: None,
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn status_for(role: Option<Option<UserRole>>) -> StatusCode {
        let app = actix_test::init_service(
            App::new().service(
                web::resource("/teach")
                    .route(web::get().to(HttpResponse::Ok))
                    .wrap(RequireRole::new_any(UserRole::teacher_roles()))
                    // 模拟 RequireJWT 写入当前用户
                    .wrap_fn(move |req, srv| {
                        if let Some(role) = role.clone() {
                            req.extensions_mut().insert(user_with(role));
                        }
                        srv.call(req)
                    }),
            ),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/teach").to_request();
        app.call(req).await.unwrap().status()
    }

    #[test]
    fn test_permits_only_listed_roles() {
        let allowed: Vec<UserRole> = UserRole::teacher_roles()
            .iter()
            .map(|r| (*r).clone())
            .collect();
        assert!(RequireRole::permits(&allowed, Some(&UserRole::Teacher)));
        assert!(!RequireRole::permits(&allowed, Some(&UserRole::Student)));
        assert!(!RequireRole::permits(&allowed, None));
    }

    #[actix_web::test]
    async fn test_role_gate_statuses() {
        assert_eq!(status_for(Some(Some(UserRole::Teacher))).await, StatusCode::OK);
        assert_eq!(
            status_for(Some(Some(UserRole::Student))).await,
            StatusCode::FORBIDDEN
        );
        // 角色被删除
        assert_eq!(status_for(Some(None)).await, StatusCode::FORBIDDEN);
        // 未经过 RequireJWT
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }
}
