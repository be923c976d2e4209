use super::entities::CourseLevel;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

// 课程列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub lecturer: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub min_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub max_price: Option<i64>,
    pub level: Option<CourseLevel>,
    pub search: Option<String>,
}

// 课程列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: u64,
    pub size: u64,
    pub lecturer_id: Option<i64>,
    pub category_id: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub level: Option<CourseLevel>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CreateCourseRequest {
    pub category_id: i64,
    /// 仅管理员可指定，讲师创建时忽略并使用自身 ID
    pub lecturer_id: Option<i64>,
    pub subject: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub price: Option<i64>,
    pub level: Option<CourseLevel>,
    pub duration: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct UpdateCourseRequest {
    pub category_id: Option<i64>,
    pub subject: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub price: Option<i64>,
    pub level: Option<CourseLevel>,
    pub duration: Option<i32>,
}
