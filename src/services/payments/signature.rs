//! MoMo 请求签名
//!
//! 原始串按网关约定的固定字段顺序拼接为 `k=v&k=v`，
//! 以 secret key 做 HMAC-SHA256，输出小写十六进制。

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{CourseHubError, Result};
use crate::models::payments::requests::{MomoCreateRequest, MomoIpnPayload};

type HmacSha256 = Hmac<Sha256>;

fn join_fields(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// 创建订单的签名原始串
pub fn create_raw_signature(access_key: &str, request: &MomoCreateRequest) -> String {
    join_fields(&[
        ("accessKey", access_key),
        ("amount", &request.amount),
        ("extraData", &request.extra_data),
        ("ipnUrl", &request.ipn_url),
        ("orderId", &request.order_id),
        ("orderInfo", &request.order_info),
        ("partnerCode", &request.partner_code),
        ("redirectUrl", &request.redirect_url),
        ("requestId", &request.request_id),
        ("requestType", &request.request_type),
    ])
}

/// IPN 回调的签名原始串
pub fn ipn_raw_signature(access_key: &str, payload: &MomoIpnPayload) -> String {
    let amount = payload.amount.to_string();
    let response_time = payload.response_time.to_string();
    let result_code = payload.result_code.to_string();
    let trans_id = payload.trans_id.to_string();
    join_fields(&[
        ("accessKey", access_key),
        ("amount", &amount),
        ("extraData", &payload.extra_data),
        ("message", &payload.message),
        ("orderId", &payload.order_id),
        ("orderInfo", &payload.order_info),
        ("orderType", &payload.order_type),
        ("partnerCode", &payload.partner_code),
        ("payType", &payload.pay_type),
        ("requestId", &payload.request_id),
        ("responseTime", &response_time),
        ("resultCode", &result_code),
        ("transId", &trans_id),
    ])
}

fn new_mac(secret_key: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| CourseHubError::payment_gateway(format!("签名密钥无效: {e}")))
}

pub fn sign(secret_key: &str, raw: &str) -> Result<String> {
    let mut mac = new_mac(secret_key)?;
    mac.update(raw.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 常量时间比较签名
pub fn verify(secret_key: &str, raw: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = new_mac(secret_key) else {
        return false;
    };
    mac.update(raw.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ACCESS_KEY: &str = "F8BBA842ECF85";
    pub(crate) const SECRET_KEY: &str = "K951B6PE1waDMi640xX08PD3vg6EkVlz";

    fn create_request() -> MomoCreateRequest {
        MomoCreateRequest {
            partner_code: "MOMO".into(),
            partner_name: "Test".into(),
            store_id: "MomoTestStore".into(),
            request_id: "request-1".into(),
            amount: "100000".into(),
            order_id: "order-1".into(),
            order_info: "pay with MoMo".into(),
            redirect_url: "https://example.com/return".into(),
            ipn_url: "https://example.com/ipn".into(),
            lang: "vi".into(),
            extra_data: "42".into(),
            request_type: "captureWallet".into(),
            signature: String::new(),
        }
    }

    pub(crate) fn ipn_payload() -> MomoIpnPayload {
        MomoIpnPayload {
            partner_code: "MOMO".into(),
            order_id: "order-1".into(),
            request_id: "request-1".into(),
            amount: 100_000,
            order_info: "pay with MoMo".into(),
            order_type: "momo_wallet".into(),
            trans_id: 4_088_878_653,
            result_code: 0,
            message: "Successful.".into(),
            pay_type: "qr".into(),
            response_time: 1_721_720_663_942,
            extra_data: "42".into(),
            signature: String::new(),
        }
    }

    #[test]
    fn test_create_raw_signature_order() {
        let raw = create_raw_signature(ACCESS_KEY, &create_request());
        assert_eq!(
            raw,
            "accessKey=F8BBA842ECF85&amount=100000&extraData=42&ipnUrl=https://example.com/ipn\
             &orderId=order-1&orderInfo=pay with MoMo&partnerCode=MOMO\
             &redirectUrl=https://example.com/return&requestId=request-1&requestType=captureWallet"
        );
    }

    #[test]
    fn test_create_signature_digest() {
        let raw = create_raw_signature(ACCESS_KEY, &create_request());
        assert_eq!(
            sign(SECRET_KEY, &raw).unwrap(),
            "2ca5155b08d29b9c25322fe7a8ba98a5818734afe044a52c52593b915dbe3c9a"
        );
    }

    #[test]
    fn test_ipn_signature_digest() {
        let payload = ipn_payload();
        let raw = ipn_raw_signature(ACCESS_KEY, &payload);
        assert!(raw.starts_with("accessKey=F8BBA842ECF85&amount=100000&extraData=42&message="));
        assert!(raw.ends_with("&resultCode=0&transId=4088878653"));
        let signature = sign(SECRET_KEY, &raw).unwrap();
        assert_eq!(
            signature,
            "e8123451a751b3eab12bf17c2ddd6ee2d88957368b04ddc8410139ecbd8fcb70"
        );
        assert!(verify(SECRET_KEY, &raw, &signature));
    }

    #[test]
    fn test_tampered_field_fails_verification() {
        let mut payload = ipn_payload();
        let signature = sign(SECRET_KEY, &ipn_raw_signature(ACCESS_KEY, &payload)).unwrap();

        payload.amount = 1;
        assert!(!verify(
            SECRET_KEY,
            &ipn_raw_signature(ACCESS_KEY, &payload),
            &signature
        ));
    }

    #[test]
    fn test_malformed_signature_is_rejected() {
        let raw = ipn_raw_signature(ACCESS_KEY, &ipn_payload());
        assert!(!verify(SECRET_KEY, &raw, "not-hex"));
        assert!(!verify(SECRET_KEY, &raw, ""));
    }
}
