/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一限制键在 `window_secs` 内最多放行 `max_requests` 次，
 * 超出返回 429 并带上 `Retry-After`（窗口剩余秒数）。
 *
 * ```rust,ignore
 * web::post().to(login).wrap(RateLimit::login())
 * ```
 *
 * 限制键为 `前缀:user:<id>`（已认证）或 `前缀:ip:<ip>`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ErrorCode, users::entities::User};

use super::create_error_response;

fn remaining_header() -> HeaderName {
    HeaderName::from_static("x-ratelimit-remaining")
}

/// 一个限制键当前窗口的计数
#[derive(Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl Window {
    /// 记一次请求；旧窗口过期则开启新窗口
    fn hit(previous: Option<Window>, now: Instant, window: Duration) -> Window {
        match previous {
            Some(w) if now.duration_since(w.started) < window => Window {
                started: w.started,
                count: w.count.saturating_add(1),
            },
            _ => Window {
                started: now,
                count: 1,
            },
        }
    }

    fn retry_after(&self, now: Instant, window: Duration) -> u64 {
        window
            .saturating_sub(now.duration_since(self.started))
            .as_secs()
            .max(1)
    }
}

// 过期窗口会在下一次命中时被重置，TTL 只负责回收不再访问的键
static RATE_LIMIT_WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀，不同端点互不影响
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 找回密码（发送、校验与重置验证码）：3 次/分钟
    pub fn forget_password() -> Self {
        Self::new(3, 60).with_prefix("forget_password")
    }

    /// 支付网关回调：60 次/分钟
    pub fn payment_ipn() -> Self {
        Self::new(60, 60).with_prefix("payment_ipn")
    }

    fn key_for(&self, req: &ServiceRequest) -> String {
        let user_id = req.extensions().get::<User>().map(|user| user.id);
        let identifier = match user_id {
            Some(id) => format!("user:{id}"),
            None => format!("ip:{}", client_ip(req)),
        };
        if self.key_prefix.is_empty() {
            identifier
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }
}

/// 客户端 IP：优先连接信息，其次代理头中第一个合法地址
///
/// 直接暴露在不可信网络时，转发头可以被伪造。
fn client_ip(req: &ServiceRequest) -> String {
    fn is_ip(s: &str) -> bool {
        s.parse::<IpAddr>().is_ok()
    }

    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    if let Some(ip) = connection_ip.as_deref().filter(|ip| is_ip(ip)) {
        return ip.to_string();
    }

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = req.headers().get("X-Real-IP").and_then(|v| v.to_str().ok());
    [forwarded, real_ip]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|ip| is_ip(ip))
        .map(str::to_string)
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    let mut response = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "请求过于频繁，请稍后再试",
    );
    let headers = response.headers_mut();
    headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
    headers.insert(remaining_header(), HeaderValue::from(0u32));
    response
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = limit.key_for(&req);
            let now = Instant::now();

            // 原子地读取并更新计数，并发请求不会丢失计数
            let window = RATE_LIMIT_WINDOWS
                .entry(key.clone())
                .and_upsert_with(|previous| {
                    ready(Window::hit(
                        previous.map(|entry| entry.into_value()),
                        now,
                        limit.window,
                    ))
                })
                .await
                .into_value();

            if window.count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} ({}/{})",
                    key, window.count, limit.max_requests
                );
                let response = too_many_requests(window.retry_after(now, limit.window));
                return Ok(req.into_response(response.map_into_right_body()));
            }

            let remaining = limit.max_requests - window.count;
            let mut res = srv.call(req).await?;
            res.headers_mut()
                .insert(remaining_header(), HeaderValue::from(remaining));
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test as actix_test, web};

    #[test]
    fn test_window_counts_and_resets() {
        let window = Duration::from_secs(60);
        let start = Instant::now();

        let first = Window::hit(None, start, window);
        assert_eq!(first.count, 1);

        let second = Window::hit(Some(first), start + Duration::from_secs(30), window);
        assert_eq!(second.count, 2);
        assert_eq!(second.started, start);
        assert_eq!(
            second.retry_after(start + Duration::from_secs(30), window),
            30
        );

        // 窗口结束后重新计数
        let fresh = Window::hit(Some(second), start + Duration::from_secs(61), window);
        assert_eq!(fresh.count, 1);
        assert_eq!(fresh.started, start + Duration::from_secs(61));
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = actix_test::init_service(
            App::new().route(
                "/limited",
                web::post()
                    .to(HttpResponse::Ok)
                    .wrap(RateLimit::new(2, 60).with_prefix("test_over_limit")),
            ),
        )
        .await;

        for expected_remaining in ["1", "0"] {
            let req = actix_test::TestRequest::post().uri("/limited").to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(
                res.headers().get(remaining_header()).unwrap(),
                expected_remaining
            );
        }

        let req = actix_test::TestRequest::post().uri("/limited").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(res.headers().contains_key(RETRY_AFTER));
    }

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(60));
        assert_eq!(login.key_prefix, "login");
        assert_eq!(RateLimit::payment_ipn().max_requests, 60);
    }
}
