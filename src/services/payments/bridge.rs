//! 支付桥
//!
//! 发起：先落库 PENDING 支付记录，再调用网关取得跳转地址。
//! 确认：校验回调签名后交给存储层在事务内迁移支付与选课状态。

use std::sync::Arc;

use uuid::Uuid;

use super::gateway::PaymentGateway;
use super::signature;
use crate::config::MomoConfig;
use crate::errors::{CourseHubError, Result};
use crate::models::enrollments::entities::Enrollment;
use crate::models::payments::{
    entities::{NewPayment, PaymentOutcome},
    requests::{MomoCreateRequest, MomoIpnPayload},
};
use crate::storage::{PaymentConfirmation, Storage};

pub const PAYMENT_METHOD_MOMO: &str = "momo";

/// 发起支付的结果
#[derive(Debug, Clone)]
pub struct PaymentInitiation {
    pub order_id: String,
    pub pay_url: String,
}

pub struct PaymentBridge {
    storage: Arc<dyn Storage>,
    gateway: Arc<dyn PaymentGateway>,
    config: MomoConfig,
}

impl PaymentBridge {
    pub fn new(
        storage: Arc<dyn Storage>,
        gateway: Arc<dyn PaymentGateway>,
        config: MomoConfig,
    ) -> Self {
        Self {
            storage,
            gateway,
            config,
        }
    }

    pub async fn initiate(&self, enrollment: &Enrollment, amount: i64) -> Result<PaymentInitiation> {
        let order_id = Uuid::new_v4().to_string();
        let request_id = Uuid::new_v4().to_string();

        let mut request = MomoCreateRequest {
            partner_code: self.config.partner_code.clone(),
            partner_name: self.config.partner_name.clone(),
            store_id: self.config.store_id.clone(),
            request_id: request_id.clone(),
            amount: amount.to_string(),
            order_id: order_id.clone(),
            order_info: self.config.order_info.clone(),
            redirect_url: self.config.redirect_url.clone(),
            ipn_url: self.config.ipn_url.clone(),
            lang: self.config.lang.clone(),
            extra_data: enrollment.id.to_string(),
            request_type: self.config.request_type.clone(),
            signature: String::new(),
        };
        let raw = signature::create_raw_signature(&self.config.access_key, &request);
        request.signature = signature::sign(&self.config.secret_key, &raw)?;

        self.storage
            .create_payment(NewPayment {
                order_id: order_id.clone(),
                request_id,
                user_id: enrollment.user_id,
                course_id: enrollment.course_id,
                user_course_id: enrollment.id,
                amount,
                method: PAYMENT_METHOD_MOMO.to_string(),
            })
            .await?;

        let response = self.gateway.create_payment(&request).await?;
        match response.pay_url.filter(|url| !url.is_empty()) {
            Some(pay_url) => {
                tracing::info!(
                    "Payment {} initiated for enrollment {}",
                    order_id,
                    enrollment.id
                );
                Ok(PaymentInitiation { order_id, pay_url })
            }
            None => Err(CourseHubError::payment_gateway(format!(
                "网关未返回支付地址 (resultCode={:?}, message={:?})",
                response.result_code, response.message
            ))),
        }
    }

    /// 处理网关回调，订单不存在时返回 None
    pub async fn confirm(&self, payload: &MomoIpnPayload) -> Result<Option<PaymentOutcome>> {
        let raw = signature::ipn_raw_signature(&self.config.access_key, payload);
        if !signature::verify(&self.config.secret_key, &raw, &payload.signature) {
            tracing::warn!("Rejected IPN with invalid signature for order {}", payload.order_id);
            return Err(CourseHubError::invalid_signature("Invalid signature"));
        }

        let outcome = self
            .storage
            .confirm_payment(PaymentConfirmation {
                order_id: payload.order_id.clone(),
                success: payload.result_code == 0,
                trans_id: payload.trans_id.to_string(),
                result_code: payload.result_code,
                message: payload.message.clone(),
                amount: payload.amount,
            })
            .await?;

        if outcome == Some(PaymentOutcome::Succeeded) {
            self.open_course_progress(&payload.order_id).await;
        }
        Ok(outcome)
    }

    // 支付成功后建立课程进度记录，失败只记录日志
    async fn open_course_progress(&self, order_id: &str) {
        let payment = match self.storage.get_payment_by_id(order_id).await {
            Ok(Some(payment)) => payment,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Failed to reload payment {}: {}", order_id, e);
                return;
            }
        };
        if let Err(e) = self
            .storage
            .recompute_course_progress(payment.user_id, payment.course_id)
            .await
        {
            tracing::warn!(
                "Failed to initialise progress for user {} course {}: {}",
                payment.user_id,
                payment.course_id,
                e
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::payments::{entities::PaymentStatus, responses::MomoCreateResponse};
    use crate::models::users::entities::UserRole;
    use crate::services::payments::signature::tests::{ACCESS_KEY, SECRET_KEY};
    use crate::storage::sea_orm_storage::test_support::{
        memory_storage, seed_course, seed_lessons, seed_user,
    };
    use std::sync::Mutex;

    /// 记录请求并返回固定响应的网关
    pub(crate) struct FakeGateway {
        pub pay_url: Option<String>,
        pub requests: Mutex<Vec<MomoCreateRequest>>,
    }

    impl FakeGateway {
        pub(crate) fn new(pay_url: Option<&str>) -> Self {
            Self {
                pay_url: pay_url.map(str::to_string),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_payment(&self, request: &MomoCreateRequest) -> Result<MomoCreateResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(MomoCreateResponse {
                pay_url: self.pay_url.clone(),
                result_code: Some(0),
                message: Some("Successful.".into()),
            })
        }
    }

    pub(crate) fn momo_config() -> MomoConfig {
        MomoConfig {
            endpoint: "http://localhost/create".into(),
            partner_code: "MOMO".into(),
            partner_name: "Test".into(),
            store_id: "MomoTestStore".into(),
            access_key: ACCESS_KEY.into(),
            secret_key: SECRET_KEY.into(),
            order_info: "pay with MoMo".into(),
            redirect_url: "https://example.com/return".into(),
            ipn_url: "https://example.com/ipn".into(),
            request_type: "captureWallet".into(),
            lang: "vi".into(),
            timeout: 5,
        }
    }

    fn signed_ipn(order_id: &str, enrollment_id: i64, result_code: i64) -> MomoIpnPayload {
        let mut payload = MomoIpnPayload {
            partner_code: "MOMO".into(),
            order_id: order_id.into(),
            request_id: "request-1".into(),
            amount: 100_000,
            order_info: "pay with MoMo".into(),
            order_type: "momo_wallet".into(),
            trans_id: 4_088_878_653,
            result_code,
            message: "done".into(),
            pay_type: "qr".into(),
            response_time: 1_721_720_663_942,
            extra_data: enrollment_id.to_string(),
            signature: String::new(),
        };
        let raw = signature::ipn_raw_signature(ACCESS_KEY, &payload);
        payload.signature = signature::sign(SECRET_KEY, &raw).unwrap();
        payload
    }

    /// 种子数据：讲师、学生、3 个课时的付费课程和一条 PENDING 选课
    async fn pending_enrollment() -> (Arc<dyn Storage>, Enrollment, Vec<i64>) {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course = seed_course(&storage, teacher.id, Some(100_000)).await;
        let lessons = seed_lessons(&storage, course.id, 3).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let enrollment = storage
            .create_enrollment(student.id, course.id, EnrollmentStatus::Pending)
            .await
            .unwrap();
        (
            storage,
            enrollment,
            lessons.into_iter().map(|lesson| lesson.id).collect(),
        )
    }

    #[tokio::test]
    async fn test_initiate_persists_before_returning_url() {
        let (storage, enrollment, _) = pending_enrollment().await;
        let gateway = Arc::new(FakeGateway::new(Some("https://pay.example/abc")));
        let bridge = PaymentBridge::new(storage.clone(), gateway.clone(), momo_config());

        let initiation = bridge.initiate(&enrollment, 100_000).await.unwrap();
        assert_eq!(initiation.pay_url, "https://pay.example/abc");

        let payment = storage
            .get_payment_by_id(&initiation.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.user_course_id, enrollment.id);
        assert_eq!(payment.amount, 100_000);

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, "100000");
        assert_eq!(requests[0].extra_data, enrollment.id.to_string());
        let raw = signature::create_raw_signature(ACCESS_KEY, &requests[0]);
        assert!(signature::verify(SECRET_KEY, &raw, &requests[0].signature));
    }

    #[tokio::test]
    async fn test_missing_pay_url_is_gateway_error() {
        let (storage, enrollment, _) = pending_enrollment().await;
        let bridge = PaymentBridge::new(
            storage.clone(),
            Arc::new(FakeGateway::new(None)),
            momo_config(),
        );

        let err = bridge.initiate(&enrollment, 100_000).await.unwrap_err();
        assert_eq!(err.code(), "E014");

        let enrollment = storage
            .get_enrollment_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_tampered_ipn_changes_nothing() {
        let (storage, enrollment, _) = pending_enrollment().await;
        let bridge = PaymentBridge::new(
            storage.clone(),
            Arc::new(FakeGateway::new(Some("https://pay.example/abc"))),
            momo_config(),
        );
        let initiation = bridge.initiate(&enrollment, 100_000).await.unwrap();

        let mut payload = signed_ipn(&initiation.order_id, enrollment.id, 0);
        payload.amount = 1;
        let err = bridge.confirm(&payload).await.unwrap_err();
        assert_eq!(err.code(), "E015");

        let payment = storage
            .get_payment_by_id(&initiation.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        let enrollment = storage
            .get_enrollment_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_resigned_ipn_with_wrong_amount_is_rejected() {
        let (storage, enrollment, _) = pending_enrollment().await;
        let bridge = PaymentBridge::new(
            storage.clone(),
            Arc::new(FakeGateway::new(Some("https://pay.example/abc"))),
            momo_config(),
        );
        let initiation = bridge.initiate(&enrollment, 100_000).await.unwrap();

        let mut payload = signed_ipn(&initiation.order_id, enrollment.id, 0);
        payload.amount = 1_000;
        let raw = signature::ipn_raw_signature(ACCESS_KEY, &payload);
        payload.signature = signature::sign(SECRET_KEY, &raw).unwrap();

        let response = crate::services::payments::ipn::handle_momo_ipn(&bridge, payload)
            .await
            .unwrap();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let enrollment = storage
            .get_enrollment_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        let payment = storage
            .get_payment_by_id(&initiation.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_order_yields_none() {
        let (storage, enrollment, _) = pending_enrollment().await;
        let bridge = PaymentBridge::new(
            storage,
            Arc::new(FakeGateway::new(Some("https://pay.example/abc"))),
            momo_config(),
        );
        let payload = signed_ipn("no-such-order", enrollment.id, 0);
        assert_eq!(bridge.confirm(&payload).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_paid_course_end_to_end() {
        let (storage, enrollment, lesson_ids) = pending_enrollment().await;
        let bridge = PaymentBridge::new(
            storage.clone(),
            Arc::new(FakeGateway::new(Some("https://pay.example/abc"))),
            momo_config(),
        );
        let initiation = bridge.initiate(&enrollment, 100_000).await.unwrap();

        let payload = signed_ipn(&initiation.order_id, enrollment.id, 0);
        assert_eq!(
            bridge.confirm(&payload).await.unwrap(),
            Some(PaymentOutcome::Succeeded)
        );
        // 重放同一回调结果不变
        assert_eq!(
            bridge.confirm(&payload).await.unwrap(),
            Some(PaymentOutcome::Succeeded)
        );

        let payment = storage
            .get_payment_by_id(&initiation.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
        let active = storage
            .get_enrollment_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.status, EnrollmentStatus::InProgress);

        for (lesson_id, percentage) in [(lesson_ids[0], 100.0), (lesson_ids[1], 95.0)] {
            storage
                .upsert_lesson_progress(
                    enrollment.user_id,
                    lesson_id,
                    enrollment.course_id,
                    300,
                    percentage,
                )
                .await
                .unwrap();
        }
        let progress = storage
            .recompute_course_progress(enrollment.user_id, enrollment.course_id)
            .await
            .unwrap();
        assert_eq!(progress.total_lessons, 3);
        assert_eq!(progress.completed_lessons, 2);
        assert_eq!(progress.total_watch_time, 600);
        assert!((progress.completion_percentage - 66.67).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_failed_ipn_marks_payment_failed() {
        let (storage, enrollment, _) = pending_enrollment().await;
        let bridge = PaymentBridge::new(
            storage.clone(),
            Arc::new(FakeGateway::new(Some("https://pay.example/abc"))),
            momo_config(),
        );
        let initiation = bridge.initiate(&enrollment, 100_000).await.unwrap();

        let payload = signed_ipn(&initiation.order_id, enrollment.id, 1006);
        assert_eq!(
            bridge.confirm(&payload).await.unwrap(),
            Some(PaymentOutcome::Failed)
        );
        let enrollment = storage
            .get_enrollment_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::PaymentFailed);
    }
}
