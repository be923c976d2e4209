use super::entities::Course;
use crate::models::chapters::entities::Chapter;
use crate::models::common::PaginationInfo;
use crate::models::lessons::entities::{Document, Lesson};
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 讲师公开信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct LecturerSummary {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub introduce: Option<String>,
}

impl From<User> for LecturerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name(),
            username: user.username,
            avatar_url: user.profile.avatar_url,
            introduce: user.profile.introduce,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

// 热门课程
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct TopCourse {
    pub course: Course,
    pub enrollment_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct TopCourseListResponse {
    pub items: Vec<TopCourse>,
}

// 课程详情：章节 -> 课时 -> 资料
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct LessonOutline {
    #[serde(flatten)]
    #[ts(flatten)]
    pub lesson: Lesson,
    pub documents: Vec<Document>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct ChapterOutline {
    #[serde(flatten)]
    #[ts(flatten)]
    pub chapter: Chapter,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CourseDetailResponse {
    pub course: Course,
    pub lecturer: Option<LecturerSummary>,
    pub chapters: Vec<ChapterOutline>,
}
