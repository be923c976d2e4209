use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/progress.ts")]
pub struct UpdateLessonProgressRequest {
    pub lesson_id: i64,
    #[serde(default)]
    pub watch_time: i64,
    pub completion_percentage: f64,
}
