use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 支付状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../bindings/payment.ts")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub const PENDING: &'static str = "PENDING";
    pub const SUCCESS: &'static str = "SUCCESS";
    pub const FAILED: &'static str = "FAILED";

    /// 是否已经收到网关的最终结果
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<PaymentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的支付状态: '{s}'. 支持的状态: PENDING, SUCCESS, FAILED"
            ))
        })
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "{}", Self::PENDING),
            PaymentStatus::Success => write!(f, "{}", Self::SUCCESS),
            PaymentStatus::Failed => write!(f, "{}", Self::FAILED),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(PaymentStatus::Pending),
            Self::SUCCESS => Ok(PaymentStatus::Success),
            Self::FAILED => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

// 支付记录，主键即网关订单号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/payment.ts")]
pub struct Payment {
    pub id: String,
    pub request_id: String,
    pub user_id: i64,
    pub course_id: i64,
    pub user_course_id: i64,
    pub amount: i64,
    pub method: String,
    pub status: PaymentStatus,
    pub trans_id: Option<String>,
    pub result_code: Option<i64>,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 新建的待支付记录
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: String,
    pub request_id: String,
    pub user_id: i64,
    pub course_id: i64,
    pub user_course_id: i64,
    pub amount: i64,
    pub method: String,
}

/// 回调处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

impl PaymentOutcome {
    pub fn from_status(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Success => Self::Succeeded,
            _ => Self::Failed,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PaymentOutcome::Succeeded => "Payment success",
            PaymentOutcome::Failed => "Payment failed",
        }
    }
}
