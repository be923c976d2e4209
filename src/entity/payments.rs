//! 支付实体，主键为网关订单号

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub request_id: String,
    pub user_id: i64,
    pub course_id: i64,
    pub user_course_id: i64,
    pub amount: i64,
    pub method: String,
    pub status: String,
    pub trans_id: Option<String>,
    pub result_code: Option<i64>,
    pub message: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_courses::Entity",
        from = "Column::UserCourseId",
        to = "super::user_courses::Column::Id",
        on_delete = "Cascade"
    )]
    UserCourse,
}

impl Related<super::user_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCourse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use crate::models::payments::entities::{Payment, PaymentStatus};

        Payment {
            id: self.id,
            request_id: self.request_id,
            user_id: self.user_id,
            course_id: self.course_id,
            user_course_id: self.user_course_id,
            amount: self.amount,
            method: self.method,
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Pending),
            trans_id: self.trans_id,
            result_code: self.result_code,
            message: self.message,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
