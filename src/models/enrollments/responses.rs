use super::entities::Enrollment;
use crate::models::common::PaginationInfo;
use crate::models::courses::entities::Course;
use crate::models::progress::entities::CourseProgress;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct CreateEnrollmentResponse {
    pub enrollment: Enrollment,
    /// 免费课程直接开通，没有支付跳转
    pub pay_url: Option<String>,
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<Enrollment>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct EnrolledCourse {
    pub enrollment: Enrollment,
    pub course: Course,
    pub progress: Option<CourseProgress>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/enrollment.ts")]
pub struct EnrolledCourseListResponse {
    pub items: Vec<EnrolledCourse>,
}
