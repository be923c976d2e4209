use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 选课状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub enum EnrollmentStatus {
    Pending,       // 等待支付
    InProgress,    // 学习中
    Complete,      // 已完成
    Failed,        // 失败
    Inactive,      // 已停用
    PaymentFailed, // 支付失败
}

impl EnrollmentStatus {
    pub const PENDING: &'static str = "PENDING";
    pub const IN_PROGRESS: &'static str = "IN_PROGRESS";
    pub const COMPLETE: &'static str = "COMPLETE";
    pub const FAILED: &'static str = "FAILED";
    pub const INACTIVE: &'static str = "INACTIVE";
    pub const PAYMENT_FAILED: &'static str = "PAYMENT_FAILED";

    /// 可以访问课程内容（论坛、进度）的状态
    pub fn grants_access(&self) -> bool {
        matches!(self, Self::InProgress | Self::Complete)
    }

    /// 可以发起新一次支付的状态
    pub fn can_retry_payment(&self) -> bool {
        matches!(self, Self::Pending | Self::PaymentFailed | Self::Failed)
    }

    /// 支付回调后的状态迁移
    ///
    /// 已激活的选课不会被失败回调降级，`Inactive` 不受支付影响。
    pub fn apply_payment_result(self, success: bool) -> Self {
        match (self, success) {
            (Self::Inactive, _) => Self::Inactive,
            (Self::InProgress, _) => Self::InProgress,
            (Self::Complete, _) => Self::Complete,
            (Self::Pending | Self::PaymentFailed | Self::Failed, true) => Self::InProgress,
            (Self::Pending | Self::PaymentFailed | Self::Failed, false) => Self::PaymentFailed,
        }
    }
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EnrollmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的选课状态: '{s}'. 支持的状态: PENDING, IN_PROGRESS, COMPLETE, FAILED, INACTIVE, PAYMENT_FAILED"
            ))
        })
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnrollmentStatus::Pending => Self::PENDING,
            EnrollmentStatus::InProgress => Self::IN_PROGRESS,
            EnrollmentStatus::Complete => Self::COMPLETE,
            EnrollmentStatus::Failed => Self::FAILED,
            EnrollmentStatus::Inactive => Self::INACTIVE,
            EnrollmentStatus::PaymentFailed => Self::PAYMENT_FAILED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(EnrollmentStatus::Pending),
            Self::IN_PROGRESS => Ok(EnrollmentStatus::InProgress),
            Self::COMPLETE => Ok(EnrollmentStatus::Complete),
            Self::FAILED => Ok(EnrollmentStatus::Failed),
            Self::INACTIVE => Ok(EnrollmentStatus::Inactive),
            Self::PAYMENT_FAILED => Ok(EnrollmentStatus::PaymentFailed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EnrollmentStatus; 6] = [
        EnrollmentStatus::Pending,
        EnrollmentStatus::InProgress,
        EnrollmentStatus::Complete,
        EnrollmentStatus::Failed,
        EnrollmentStatus::Inactive,
        EnrollmentStatus::PaymentFailed,
    ];

    #[test]
    fn test_success_activates_payable_states() {
        for status in [
            EnrollmentStatus::Pending,
            EnrollmentStatus::PaymentFailed,
            EnrollmentStatus::Failed,
        ] {
            assert_eq!(
                status.apply_payment_result(true),
                EnrollmentStatus::InProgress
            );
            assert_eq!(
                status.apply_payment_result(false),
                EnrollmentStatus::PaymentFailed
            );
        }
    }

    #[test]
    fn test_failure_never_downgrades_active_enrollment() {
        assert_eq!(
            EnrollmentStatus::InProgress.apply_payment_result(false),
            EnrollmentStatus::InProgress
        );
        assert_eq!(
            EnrollmentStatus::Complete.apply_payment_result(false),
            EnrollmentStatus::Complete
        );
        assert_eq!(
            EnrollmentStatus::Complete.apply_payment_result(true),
            EnrollmentStatus::Complete
        );
    }

    #[test]
    fn test_inactive_is_untouched() {
        assert_eq!(
            EnrollmentStatus::Inactive.apply_payment_result(true),
            EnrollmentStatus::Inactive
        );
        assert_eq!(
            EnrollmentStatus::Inactive.apply_payment_result(false),
            EnrollmentStatus::Inactive
        );
    }

    #[test]
    fn test_replay_is_idempotent() {
        for status in ALL {
            for success in [true, false] {
                let once = status.apply_payment_result(success);
                assert_eq!(once.apply_payment_result(success), once);
            }
        }
    }

    #[test]
    fn test_wire_form() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            let back: EnrollmentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
        assert!("in_progress".parse::<EnrollmentStatus>().is_err());
    }
}
