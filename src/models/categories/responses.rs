use super::entities::Category;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/category.ts")]
pub struct CategoryListResponse {
    pub items: Vec<Category>,
}
