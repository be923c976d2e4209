use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub course_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
