pub mod create;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::forums::entities::{Forum, Topic};
use crate::models::forums::requests::{CreateForumRequest, ForumListParams};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::access::{can_access_forum, is_admin, is_teacher};

pub struct ForumService {
    storage: Option<Arc<dyn Storage>>,
}

impl ForumService {
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

    pub async fn list_forums(
        &self,
        query: ForumListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_forums(self, query, request).await
    }

    pub async fn get_forum(&self, forum_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_forum(self, forum_id, request).await
    }

    pub async fn create_forum(
        &self,
        forum_data: CreateForumRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_forum(self, forum_data, request).await
    }
}

/// 校验用户可访问论坛，必要时才查询选课记录
pub(crate) async fn ensure_forum_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    forum: &Forum,
) -> Result<(), HttpResponse> {
    let role = user.role.as_ref();
    let enrollment = match forum.course_id {
        Some(course_id) if !is_admin(role) && !(is_teacher(role) && forum.user_id == user.id) => {
            storage
                .get_enrollment(user.id, course_id)
                .await
                .map_err(|e| {
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to retrieve enrollment: {e}"),
                    ))
                })?
                .filter(|enrollment| enrollment.active)
        }
        _ => None,
    };

    if can_access_forum(role, user.id, forum, enrollment.as_ref()) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ForumAccessDenied,
            "You do not have access to this forum",
        )))
    }
}

/// 加载论坛并校验访问权限
pub(crate) async fn load_forum(
    storage: &Arc<dyn Storage>,
    user: &User,
    forum_id: i64,
) -> Result<Forum, HttpResponse> {
    let forum = match storage.get_forum_by_id(forum_id).await {
        Ok(Some(forum)) => forum,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ForumNotFound,
                "Forum not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve forum: {e}"),
                )),
            );
        }
    };
    ensure_forum_access(storage, user, &forum).await?;
    Ok(forum)
}

/// 加载主题及其论坛并校验访问权限
pub(crate) async fn load_topic_context(
    storage: &Arc<dyn Storage>,
    user: &User,
    topic_id: i64,
) -> Result<(Topic, Forum), HttpResponse> {
    let topic = match storage.get_topic_by_id(topic_id).await {
        Ok(Some(topic)) => topic,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TopicNotFound,
                "Topic not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve topic: {e}"),
                )),
            );
        }
    };
    let forum = load_forum(storage, user, topic.forum_id).await?;
    Ok((topic, forum))
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}
