//! 支付存储操作

use super::SeaOrmStorage;
use crate::entity::payments::{self, ActiveModel, Entity as Payments};
use crate::entity::user_courses::{self, Entity as UserCourses};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    enrollments::entities::EnrollmentStatus,
    payments::entities::{NewPayment, Payment, PaymentOutcome, PaymentStatus},
};
use crate::storage::PaymentConfirmation;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::{info, warn};

impl SeaOrmStorage {
    /// 写入待支付记录
    pub async fn create_payment_impl(&self, payment: NewPayment) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(payment.order_id),
            request_id: Set(payment.request_id),
            user_id: Set(payment.user_id),
            course_id: Set(payment.course_id),
            user_course_id: Set(payment.user_course_id),
            amount: Set(payment.amount),
            method: Set(payment.method),
            status: Set(PaymentStatus::Pending.to_string()),
            trans_id: Set(None),
            result_code: Set(None),
            message: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建支付记录失败: {e}")))?;

        Ok(result.into_payment())
    }

    pub async fn get_payment_by_id_impl(&self, order_id: &str) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(order_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询支付记录失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 处理网关回调
    ///
    /// 事务的第一条语句就是对待支付行的写入：SQLite 上立即取得写锁，
    /// 其他后端上锁住该行，同一订单的并发回调因此串行执行。
    /// 已有最终结果的订单直接返回原结果。
    pub async fn confirm_payment_impl(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Option<PaymentOutcome>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;
        let now = chrono::Utc::now().timestamp();

        Payments::update_many()
            .col_expr(payments::Column::UpdatedAt, Expr::value(now))
            .filter(payments::Column::Id.eq(confirmation.order_id.as_str()))
            .filter(payments::Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("锁定支付记录失败: {e}")))?;

        let Some(payment) = Payments::find_by_id(confirmation.order_id.clone())
            .one(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询支付记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let current = payment
            .status
            .parse::<PaymentStatus>()
            .unwrap_or(PaymentStatus::Pending);
        if current.is_final() {
            info!(
                "重复的支付回调，订单 {} 已是 {}，忽略",
                payment.id, current
            );
            return Ok(Some(PaymentOutcome::from_status(current)));
        }

        if payment.amount != confirmation.amount {
            warn!(
                "订单 {} 回调金额 {} 与记录金额 {} 不符",
                payment.id, confirmation.amount, payment.amount
            );
            return Err(CourseHubError::amount_mismatch("Amount mismatch"));
        }

        let next = if confirmation.success {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };
        let user_course_id = payment.user_course_id;

        ActiveModel {
            id: Set(payment.id),
            status: Set(next.to_string()),
            trans_id: Set(Some(confirmation.trans_id)),
            result_code: Set(Some(confirmation.result_code)),
            message: Set(Some(confirmation.message)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| CourseHubError::database_operation(format!("更新支付记录失败: {e}")))?;

        let mut select = UserCourses::find_by_id(user_course_id);
        // SQLite 不支持 FOR UPDATE，事务已持有写锁
        if txn.get_database_backend() != DbBackend::Sqlite {
            select = select.lock_exclusive();
        }
        match select
            .one(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询选课记录失败: {e}")))?
        {
            Some(enrollment) => {
                let status = enrollment
                    .status
                    .parse::<EnrollmentStatus>()
                    .unwrap_or(EnrollmentStatus::Pending);
                let target = status.apply_payment_result(confirmation.success);
                if target != status {
                    user_courses::ActiveModel {
                        id: Set(enrollment.id),
                        status: Set(target.to_string()),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                    .map_err(|e| {
                        CourseHubError::database_operation(format!("更新选课状态失败: {e}"))
                    })?;
                }
            }
            None => warn!("支付记录关联的选课 {} 不存在", user_course_id),
        }

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(PaymentOutcome::from_status(next)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{file_storage, memory_storage, seed_course, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    async fn pending_payment(storage: &SeaOrmStorage) -> (i64, String) {
        let teacher = seed_user(storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(storage, "student01", UserRole::Student).await;
        let course = seed_course(storage, teacher.id, Some(100_000)).await;
        let enrollment = storage
            .create_enrollment_impl(student.id, course.id, EnrollmentStatus::Pending)
            .await
            .unwrap();
        let payment = storage
            .create_payment_impl(NewPayment {
                order_id: "order-1".into(),
                request_id: "request-1".into(),
                user_id: student.id,
                course_id: course.id,
                user_course_id: enrollment.id,
                amount: 100_000,
                method: "momo".into(),
            })
            .await
            .unwrap();
        (enrollment.id, payment.id)
    }

    fn confirmation(order_id: &str, success: bool) -> PaymentConfirmation {
        PaymentConfirmation {
            order_id: order_id.to_string(),
            success,
            trans_id: "2812345678".into(),
            result_code: if success { 0 } else { 1006 },
            message: "done".into(),
            amount: 100_000,
        }
    }

    #[tokio::test]
    async fn test_success_activates_enrollment() {
        let storage = memory_storage().await;
        let (enrollment_id, order_id) = pending_payment(&storage).await;

        let outcome = storage
            .confirm_payment_impl(confirmation(&order_id, true))
            .await
            .unwrap();
        assert_eq!(outcome, Some(PaymentOutcome::Succeeded));

        let payment = storage.get_payment_by_id_impl(&order_id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
        assert_eq!(payment.trans_id.as_deref(), Some("2812345678"));
        assert_eq!(payment.result_code, Some(0));

        let enrollment = storage
            .get_enrollment_by_id_impl(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::InProgress);
    }

    #[tokio::test]
    async fn test_replay_is_idempotent() {
        let storage = memory_storage().await;
        let (enrollment_id, order_id) = pending_payment(&storage).await;

        storage
            .confirm_payment_impl(confirmation(&order_id, true))
            .await
            .unwrap();
        // 成功后再收到失败回调，状态不变
        let outcome = storage
            .confirm_payment_impl(confirmation(&order_id, false))
            .await
            .unwrap();
        assert_eq!(outcome, Some(PaymentOutcome::Succeeded));

        let payment = storage.get_payment_by_id_impl(&order_id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
        let enrollment = storage
            .get_enrollment_by_id_impl(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::InProgress);
    }

    #[tokio::test]
    async fn test_failure_marks_payment_failed() {
        let storage = memory_storage().await;
        let (enrollment_id, order_id) = pending_payment(&storage).await;

        let outcome = storage
            .confirm_payment_impl(confirmation(&order_id, false))
            .await
            .unwrap();
        assert_eq!(outcome, Some(PaymentOutcome::Failed));
        let enrollment = storage
            .get_enrollment_by_id_impl(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::PaymentFailed);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let storage = memory_storage().await;
        let outcome = storage
            .confirm_payment_impl(confirmation("missing", true))
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_amount_mismatch_changes_nothing() {
        let storage = memory_storage().await;
        let (enrollment_id, order_id) = pending_payment(&storage).await;

        let mut tampered = confirmation(&order_id, true);
        tampered.amount = 1_000;
        let err = storage.confirm_payment_impl(tampered).await.unwrap_err();
        assert_eq!(err.code(), "E017");

        let payment = storage.get_payment_by_id_impl(&order_id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.trans_id.is_none());
        let enrollment = storage
            .get_enrollment_by_id_impl(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Pending);

        // 金额正确的回调仍可正常处理
        let outcome = storage
            .confirm_payment_impl(confirmation(&order_id, true))
            .await
            .unwrap();
        assert_eq!(outcome, Some(PaymentOutcome::Succeeded));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callbacks_on_pooled_sqlite() {
        let db = file_storage(8).await;
        let storage = db.storage.clone();
        let (enrollment_id, order_id) = pending_payment(&storage).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let storage = storage.clone();
            let order_id = order_id.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .confirm_payment_impl(confirmation(&order_id, true))
                    .await
            }));
        }
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            assert_eq!(outcome, Some(PaymentOutcome::Succeeded));
        }

        let payment = storage.get_payment_by_id_impl(&order_id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
        let enrollment = storage
            .get_enrollment_by_id_impl(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::InProgress);
    }
}
