//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod categories;
mod chapters;
mod comments;
mod courses;
mod enrollments;
mod forums;
mod lessons;
mod payments;
mod progress;
mod roles;
mod topics;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{CourseHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 使用已有连接（迁移需已执行）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        Self::sqlite_pool(
            url,
            config.database.pool_size,
            Duration::from_secs(config.database.timeout),
        )
        .await
    }

    pub(crate) async fn sqlite_pool(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 写事务都以写语句开头，锁等待由 busy_timeout 兜住
        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CourseHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| CourseHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CourseHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CourseHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    categories::{
        entities::Category,
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
    },
    chapters::{
        entities::Chapter,
        requests::{CreateChapterRequest, UpdateChapterRequest},
        responses::ChapterListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{ChapterOutline, CourseListResponse, TopCourse},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        responses::{EnrolledCourse, EnrollmentListResponse},
    },
    forums::{
        entities::{Comment, Forum, Topic},
        requests::{CreateForumRequest, CreateTopicRequest, NewComment, UpdateTopicRequest},
        responses::{ForumListResponse, TopicListResponse},
    },
    lessons::{
        entities::{Document, Lesson},
        requests::{CreateDocumentRequest, CreateLessonRequest, UpdateLessonRequest},
        responses::LessonListResponse,
    },
    payments::entities::{NewPayment, Payment, PaymentOutcome},
    progress::entities::{CourseProgress, LessonProgress},
    roles::{
        entities::{Permission, Role},
        requests::{CreatePermissionRequest, CreateRoleRequest, UpdateRoleRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::{ForumScope, PaymentConfirmation, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_teachers(&self) -> Result<Vec<User>> {
        self.list_teachers_impl().await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 角色模块
    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>> {
        self.get_role_by_id_impl(id).await
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.get_role_by_name_impl(name).await
    }

    async fn create_role(&self, req: CreateRoleRequest) -> Result<Role> {
        self.create_role_impl(req).await
    }

    async fn update_role(&self, id: i64, req: UpdateRoleRequest) -> Result<Option<Role>> {
        self.update_role_impl(id, req).await
    }

    async fn delete_role(&self, id: i64) -> Result<bool> {
        self.delete_role_impl(id).await
    }

    async fn list_permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
        self.list_permissions_impl(role_id).await
    }

    async fn create_permission(
        &self,
        role_id: i64,
        req: CreatePermissionRequest,
    ) -> Result<Permission> {
        self.create_permission_impl(role_id, req).await
    }

    async fn delete_permission(&self, role_id: i64, permission_id: i64) -> Result<bool> {
        self.delete_permission_impl(role_id, permission_id).await
    }

    // 分类模块
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.list_categories_impl().await
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        self.get_category_by_id_impl(id).await
    }

    async fn create_category(&self, req: CreateCategoryRequest) -> Result<Category> {
        self.create_category_impl(req).await
    }

    async fn update_category(
        &self,
        id: i64,
        req: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        self.update_category_impl(id, req).await
    }

    async fn deactivate_category(&self, id: i64) -> Result<bool> {
        self.deactivate_category_impl(id).await
    }

    // 课程模块
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn create_course(&self, lecturer_id: i64, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(lecturer_id, req).await
    }

    async fn update_course(&self, id: i64, req: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, req).await
    }

    async fn deactivate_course(&self, id: i64) -> Result<bool> {
        self.deactivate_course_impl(id).await
    }

    async fn list_top_courses(&self, limit: usize) -> Result<Vec<TopCourse>> {
        self.list_top_courses_impl(limit).await
    }

    async fn get_course_outline(&self, course_id: i64) -> Result<Vec<ChapterOutline>> {
        self.get_course_outline_impl(course_id).await
    }

    // 章节模块
    async fn list_chapters_with_pagination(
        &self,
        course_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<ChapterListResponse> {
        self.list_chapters_with_pagination_impl(course_id, page, size)
            .await
    }

    async fn get_chapter_by_id(&self, id: i64) -> Result<Option<Chapter>> {
        self.get_chapter_by_id_impl(id).await
    }

    async fn create_chapter(&self, req: CreateChapterRequest) -> Result<Chapter> {
        self.create_chapter_impl(req).await
    }

    async fn update_chapter(
        &self,
        id: i64,
        req: UpdateChapterRequest,
    ) -> Result<Option<Chapter>> {
        self.update_chapter_impl(id, req).await
    }

    async fn deactivate_chapter(&self, id: i64) -> Result<bool> {
        self.deactivate_chapter_impl(id).await
    }

    // 课时模块
    async fn list_lessons_with_pagination(
        &self,
        chapter_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<LessonListResponse> {
        self.list_lessons_with_pagination_impl(chapter_id, page, size)
            .await
    }

    async fn get_lesson_by_id(&self, id: i64) -> Result<Option<Lesson>> {
        self.get_lesson_by_id_impl(id).await
    }

    async fn get_lesson_course_id(&self, lesson_id: i64) -> Result<Option<i64>> {
        self.get_lesson_course_id_impl(lesson_id).await
    }

    async fn create_lesson(&self, req: CreateLessonRequest) -> Result<Lesson> {
        self.create_lesson_impl(req).await
    }

    async fn update_lesson(&self, id: i64, req: UpdateLessonRequest) -> Result<Option<Lesson>> {
        self.update_lesson_impl(id, req).await
    }

    async fn deactivate_lesson(&self, id: i64) -> Result<bool> {
        self.deactivate_lesson_impl(id).await
    }

    async fn list_documents(&self, lesson_id: i64) -> Result<Vec<Document>> {
        self.list_documents_impl(lesson_id).await
    }

    async fn create_document(
        &self,
        lesson_id: i64,
        req: CreateDocumentRequest,
    ) -> Result<Document> {
        self.create_document_impl(lesson_id, req).await
    }

    async fn deactivate_document(&self, lesson_id: i64, document_id: i64) -> Result<bool> {
        self.deactivate_document_impl(lesson_id, document_id).await
    }

    // 选课模块
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn get_enrollment(&self, user_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(user_id, course_id).await
    }

    async fn create_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(user_id, course_id, status).await
    }

    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_status_impl(id, status).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        user_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(user_id, page, size)
            .await
    }

    async fn list_enrolled_courses(&self, user_id: i64) -> Result<Vec<EnrolledCourse>> {
        self.list_enrolled_courses_impl(user_id).await
    }

    // 支付模块
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.create_payment_impl(payment).await
    }

    async fn get_payment_by_id(&self, order_id: &str) -> Result<Option<Payment>> {
        self.get_payment_by_id_impl(order_id).await
    }

    async fn confirm_payment(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Option<PaymentOutcome>> {
        self.confirm_payment_impl(confirmation).await
    }

    // 学习进度模块
    async fn upsert_lesson_progress(
        &self,
        user_id: i64,
        lesson_id: i64,
        course_id: i64,
        watch_time: i64,
        completion_percentage: f64,
    ) -> Result<(LessonProgress, CourseProgress)> {
        self.upsert_lesson_progress_impl(
            user_id,
            lesson_id,
            course_id,
            watch_time,
            completion_percentage,
        )
        .await
    }

    async fn recompute_course_progress(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<CourseProgress> {
        self.recompute_course_progress_impl(user_id, course_id).await
    }

    async fn list_lesson_progress(&self, user_id: i64) -> Result<Vec<LessonProgress>> {
        self.list_lesson_progress_impl(user_id).await
    }

    async fn list_course_lesson_progress(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Vec<LessonProgress>> {
        self.list_course_lesson_progress_impl(user_id, course_id)
            .await
    }

    // 论坛模块
    async fn list_forums_with_pagination(
        &self,
        scope: ForumScope,
        page: u64,
        size: u64,
    ) -> Result<ForumListResponse> {
        self.list_forums_with_pagination_impl(scope, page, size)
            .await
    }

    async fn get_forum_by_id(&self, id: i64) -> Result<Option<Forum>> {
        self.get_forum_by_id_impl(id).await
    }

    async fn get_forum_by_course_id(&self, course_id: i64) -> Result<Option<Forum>> {
        self.get_forum_by_course_id_impl(course_id).await
    }

    async fn create_forum(&self, user_id: i64, req: CreateForumRequest) -> Result<Forum> {
        self.create_forum_impl(user_id, req).await
    }

    // 主题帖模块
    async fn list_topics_with_pagination(
        &self,
        forum_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<TopicListResponse> {
        self.list_topics_with_pagination_impl(forum_id, page, size)
            .await
    }

    async fn get_topic_by_id(&self, id: i64) -> Result<Option<Topic>> {
        self.get_topic_by_id_impl(id).await
    }

    async fn create_topic(&self, user_id: i64, req: CreateTopicRequest) -> Result<Topic> {
        self.create_topic_impl(user_id, req).await
    }

    async fn update_topic(&self, id: i64, req: UpdateTopicRequest) -> Result<Option<Topic>> {
        self.update_topic_impl(id, req).await
    }

    async fn delete_topic(&self, id: i64) -> Result<bool> {
        self.delete_topic_impl(id).await
    }

    async fn increment_topic_view(&self, id: i64) -> Result<Option<i64>> {
        self.increment_topic_view_impl(id).await
    }

    // 评论模块
    async fn list_topic_comments(&self, topic_id: i64) -> Result<Vec<Comment>> {
        self.list_topic_comments_impl(topic_id).await
    }

    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>> {
        self.get_comment_by_id_impl(id).await
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        self.create_comment_impl(comment).await
    }

    async fn update_comment(&self, id: i64, content: String) -> Result<Option<Comment>> {
        self.update_comment_impl(id, content).await
    }

    async fn delete_comment(&self, id: i64) -> Result<bool> {
        self.delete_comment_impl(id).await
    }
}
