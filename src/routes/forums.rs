use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::common::PaginationQuery;
use crate::models::forums::requests::{
    CommentListParams, CreateCommentRequest, CreateForumRequest, CreateTopicRequest,
    ForumListParams, TopicListParams, UpdateCommentRequest, UpdateTopicRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{CommentService, ForumService, TopicService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static FORUM_SERVICE: Lazy<ForumService> = Lazy::new(ForumService::new_lazy);
static TOPIC_SERVICE: Lazy<TopicService> = Lazy::new(TopicService::new_lazy);
static COMMENT_SERVICE: Lazy<CommentService> = Lazy::new(CommentService::new_lazy);

// 论坛
pub async fn list_forums(
    req: HttpRequest,
    query: web::Query<ForumListParams>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.list_forums(query.into_inner(), &req).await
}

pub async fn create_forum(
    req: HttpRequest,
    forum_data: web::Json<CreateForumRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.create_forum(forum_data.into_inner(), &req).await
}

pub async fn get_forum(req: HttpRequest, forum_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.get_forum(forum_id.0, &req).await
}

// 主题
pub async fn list_topics(
    req: HttpRequest,
    query: web::Query<TopicListParams>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.list_topics(query.into_inner(), &req).await
}

pub async fn create_topic(
    req: HttpRequest,
    topic_data: web::Json<CreateTopicRequest>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.create_topic(topic_data.into_inner(), &req).await
}

pub async fn get_topic(req: HttpRequest, topic_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.get_topic(topic_id.0, &req).await
}

pub async fn update_topic(
    req: HttpRequest,
    topic_id: SafeIDI64,
    update_data: web::Json<UpdateTopicRequest>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .update_topic(topic_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_topic(req: HttpRequest, topic_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.delete_topic(topic_id.0, &req).await
}

pub async fn increment_view(req: HttpRequest, topic_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.increment_view(topic_id.0, &req).await
}

pub async fn list_topic_comments(
    req: HttpRequest,
    topic_id: SafeIDI64,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .list_topic_comments(topic_id.0, query.into_inner(), &req)
        .await
}

// 评论
pub async fn list_comments(
    req: HttpRequest,
    query: web::Query<CommentListParams>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE.list_comments(query.into_inner(), &req).await
}

pub async fn create_comment(
    req: HttpRequest,
    comment_data: web::Json<CreateCommentRequest>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .create_comment(comment_data.into_inner(), &req)
        .await
}

pub async fn get_comment(req: HttpRequest, comment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE.get_comment(comment_id.0, &req).await
}

pub async fn update_comment(
    req: HttpRequest,
    comment_id: SafeIDI64,
    update_data: web::Json<UpdateCommentRequest>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .update_comment(comment_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_comment(req: HttpRequest, comment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE.delete_comment(comment_id.0, &req).await
}

pub async fn list_replies(req: HttpRequest, comment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE.list_replies(comment_id.0, &req).await
}

// 配置路由
pub fn configure_forum_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/forums")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_forums))
            .route(
                "",
                web::post()
                    .to(create_forum)
                    // 讲师为自己的课程开设论坛
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("/{id}", web::get().to(get_forum)),
    );

    cfg.service(
        web::scope("/api/v1/topics")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_topics))
            .route("", web::post().to(create_topic))
            .route("/{id}", web::get().to(get_topic))
            .route("/{id}", web::put().to(update_topic))
            .route("/{id}", web::delete().to(delete_topic))
            .route("/{id}/increment-view", web::post().to(increment_view))
            .route("/{id}/comments", web::get().to(list_topic_comments)),
    );

    cfg.service(
        web::scope("/api/v1/comments")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_comments))
            .route("", web::post().to(create_comment))
            .route("/{id}", web::get().to(get_comment))
            .route("/{id}", web::put().to(update_comment))
            .route("/{id}", web::delete().to(delete_comment))
            .route("/{id}/replies", web::get().to(list_replies)),
    );
}
