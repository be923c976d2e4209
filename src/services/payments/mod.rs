pub mod bridge;
pub mod gateway;
pub mod ipn;
pub mod signature;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

pub use bridge::{PaymentBridge, PaymentInitiation};
pub use gateway::{MomoGateway, PaymentGateway};

use crate::models::payments::requests::MomoIpnPayload;

/// 从 app data 中取出支付桥
pub(crate) fn get_bridge(request: &HttpRequest) -> web::Data<PaymentBridge> {
    request
        .app_data::<web::Data<PaymentBridge>>()
        .expect("PaymentBridge not found in app data")
        .clone()
}

pub struct PaymentService;

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn handle_momo_ipn(
        &self,
        payload: MomoIpnPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        ipn::handle_momo_ipn(&get_bridge(request), payload).await
    }
}
