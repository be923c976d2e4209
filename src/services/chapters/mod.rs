pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::chapters::requests::{
    ChapterListParams, CreateChapterRequest, UpdateChapterRequest,
};
use crate::storage::Storage;

/// 章节列表默认页大小
pub const DEFAULT_CHAPTER_PAGE_SIZE: u64 = 6;

pub struct ChapterService {
    storage: Option<Arc<dyn Storage>>,
}

impl ChapterService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_chapters(
        &self,
        query: ChapterListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_chapters(self, query, request).await
    }

    pub async fn get_chapter(
        &self,
        chapter_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_chapter(self, chapter_id, request).await
    }

    pub async fn create_chapter(
        &self,
        chapter_data: CreateChapterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_chapter(self, chapter_data, request).await
    }

    pub async fn update_chapter(
        &self,
        chapter_id: i64,
        update_data: UpdateChapterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_chapter(self, chapter_id, update_data, request).await
    }

    pub async fn delete_chapter(
        &self,
        chapter_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_chapter(self, chapter_id, request).await
    }
}
