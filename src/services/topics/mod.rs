pub mod comments;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;
pub mod views;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::common::PaginationQuery;
use crate::models::forums::requests::{CreateTopicRequest, TopicListParams, UpdateTopicRequest};
use crate::storage::Storage;

pub struct TopicService {
    storage: Option<Arc<dyn Storage>>,
}

impl TopicService {
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

    pub async fn list_topics(
        &self,
        query: TopicListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_topics(self, query, request).await
    }

    pub async fn get_topic(&self, topic_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_topic(self, topic_id, request).await
    }

    pub async fn create_topic(
        &self,
        topic_data: CreateTopicRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_topic(self, topic_data, request).await
    }

    pub async fn update_topic(
        &self,
        topic_id: i64,
        update_data: UpdateTopicRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_topic(self, topic_id, update_data, request).await
    }

    pub async fn delete_topic(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_topic(self, topic_id, request).await
    }

    pub async fn increment_view(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        views::increment_view(self, topic_id, request).await
    }

    // 主题下的顶层评论及回复树
    pub async fn list_topic_comments(
        &self,
        topic_id: i64,
        query: PaginationQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        comments::list_topic_comments(self, topic_id, query, request).await
    }
}
