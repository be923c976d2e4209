use std::time::Duration;

use async_trait::async_trait;

use crate::config::MomoConfig;
use crate::errors::Result;
use crate::models::payments::{requests::MomoCreateRequest, responses::MomoCreateResponse};

/// 支付网关出站调用
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, request: &MomoCreateRequest) -> Result<MomoCreateResponse>;
}

pub struct MomoGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl MomoGateway {
    pub fn new(config: &MomoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout.max(1)))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for MomoGateway {
    async fn create_payment(&self, request: &MomoCreateRequest) -> Result<MomoCreateResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;
        tracing::debug!(
            "MoMo create payment for order {} answered {}",
            request.order_id,
            response.status()
        );
        // 非 JSON 响应同样视为网关错误
        Ok(response.json::<MomoCreateResponse>().await?)
    }
}
