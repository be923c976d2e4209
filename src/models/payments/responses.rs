use serde::{Deserialize, Serialize};

/// MoMo 创建订单响应，只关心跳转地址
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoCreateResponse {
    pub pay_url: Option<String>,
    pub result_code: Option<i64>,
    pub message: Option<String>,
}

/// 回调应答，网关只读取 message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpnAck {
    pub message: String,
}

impl IpnAck {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
