use actix_web::{HttpResponse, Result as ActixResult};

use super::PaymentBridge;
use crate::errors::CourseHubError;
use crate::models::payments::{requests::MomoIpnPayload, responses::IpnAck};

/// 网关回调应答只含 message 字段
pub async fn handle_momo_ipn(
    bridge: &PaymentBridge,
    payload: MomoIpnPayload,
) -> ActixResult<HttpResponse> {
    match bridge.confirm(&payload).await {
        Ok(Some(outcome)) => {
            tracing::info!("IPN for order {}: {}", payload.order_id, outcome.message());
            Ok(HttpResponse::Ok().json(IpnAck::new(outcome.message())))
        }
        Ok(None) => {
            tracing::warn!("IPN for unknown order {}", payload.order_id);
            Ok(HttpResponse::NotFound().json(IpnAck::new("Payment not found")))
        }
        Err(CourseHubError::InvalidSignature(_)) => {
            Ok(HttpResponse::BadRequest().json(IpnAck::new("Invalid signature")))
        }
        Err(CourseHubError::AmountMismatch(_)) => {
            Ok(HttpResponse::BadRequest().json(IpnAck::new("Amount mismatch")))
        }
        Err(e) => {
            tracing::error!("Failed to process IPN for order {}: {}", payload.order_id, e);
            Ok(HttpResponse::InternalServerError().json(IpnAck::new("Internal server error")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::payments::bridge::tests::{FakeGateway, momo_config};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    async fn bridge() -> PaymentBridge {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        PaymentBridge::new(
            storage,
            Arc::new(FakeGateway::new(Some("https://pay.example/abc"))),
            momo_config(),
        )
    }

    async fn ack_of(response: HttpResponse) -> IpnAck {
        let body = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_signature_answers_400() {
        let bridge = bridge().await;
        let mut payload = crate::services::payments::signature::tests::ipn_payload();
        payload.signature = "00".repeat(32);

        let response = handle_momo_ipn(&bridge, payload).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ack_of(response).await, IpnAck::new("Invalid signature"));
    }

    #[tokio::test]
    async fn test_unknown_order_answers_404() {
        let bridge = bridge().await;
        let mut payload = crate::services::payments::signature::tests::ipn_payload();
        let raw = crate::services::payments::signature::ipn_raw_signature(
            &momo_config().access_key,
            &payload,
        );
        payload.signature =
            crate::services::payments::signature::sign(&momo_config().secret_key, &raw).unwrap();

        let response = handle_momo_ipn(&bridge, payload).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
