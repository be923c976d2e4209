use super::entities::{CourseProgress, LessonProgress};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/progress.ts")]
pub struct LessonProgressListResponse {
    pub items: Vec<LessonProgress>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/progress.ts")]
pub struct UpdateLessonProgressResponse {
    pub lesson_progress: LessonProgress,
    pub course_progress: CourseProgress,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/progress.ts")]
pub struct CourseProgressResponse {
    pub course_progress: CourseProgress,
    pub lesson_progresses: Vec<LessonProgress>,
}
