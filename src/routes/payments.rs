use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::payments::requests::MomoIpnPayload;
use crate::services::PaymentService;

// 懒加载的全局 PaymentService 实例
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn momo_ipn(
    req: HttpRequest,
    payload: web::Json<MomoIpnPayload>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .handle_momo_ipn(payload.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    // 网关回调不带用户令牌，靠签名校验
    cfg.service(
        web::scope("/api/v1/payment").route(
            "/momo/ipn",
            web::post()
                .to(momo_ipn)
                .wrap(middlewares::RateLimit::payment_ipn()),
        ),
    );
}
