use serde::{Deserialize, Serialize};

/// MoMo 即时支付通知（IPN）
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoIpnPayload {
    pub partner_code: String,
    pub order_id: String,
    pub request_id: String,
    pub amount: i64,
    pub order_info: String,
    pub order_type: String,
    pub trans_id: i64,
    pub result_code: i64,
    pub message: String,
    pub pay_type: String,
    pub response_time: i64,
    pub extra_data: String,
    pub signature: String,
}

/// MoMo 创建订单请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoCreateRequest {
    pub partner_code: String,
    pub partner_name: String,
    pub store_id: String,
    pub request_id: String,
    pub amount: String,
    pub order_id: String,
    pub order_info: String,
    pub redirect_url: String,
    pub ipn_url: String,
    pub lang: String,
    pub extra_data: String,
    pub request_type: String,
    pub signature: String,
}
