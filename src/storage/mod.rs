use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 论坛列表的可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForumScope {
    /// 全部论坛（管理员）
    All,
    /// 指定用户创建的论坛（讲师）
    CreatedBy(i64),
    /// 指定用户有效选课的课程论坛
    EnrolledBy(i64),
}

/// 网关回调的结果字段
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub success: bool,
    pub trans_id: String,
    pub result_code: i64,
    pub message: String,
    /// 回调中经签名校验的金额，需与订单金额一致
    pub amount: i64,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，角色按名称关联
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 列出活跃讲师
    async fn list_teachers(&self) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 角色与权限
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>>;
    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>>;
    async fn create_role(&self, req: CreateRoleRequest) -> Result<Role>;
    async fn update_role(&self, id: i64, req: UpdateRoleRequest) -> Result<Option<Role>>;
    // 删除角色，关联用户的 role_id 置空
    async fn delete_role(&self, id: i64) -> Result<bool>;
    async fn list_permissions(&self, role_id: i64) -> Result<Vec<Permission>>;
    async fn create_permission(
        &self,
        role_id: i64,
        req: CreatePermissionRequest,
    ) -> Result<Permission>;
    async fn delete_permission(&self, role_id: i64, permission_id: i64) -> Result<bool>;

    /// 课程分类
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>>;
    async fn create_category(&self, req: CreateCategoryRequest) -> Result<Category>;
    async fn update_category(
        &self,
        id: i64,
        req: UpdateCategoryRequest,
    ) -> Result<Option<Category>>;
    async fn deactivate_category(&self, id: i64) -> Result<bool>;

    /// 课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn create_course(&self, lecturer_id: i64, req: CreateCourseRequest) -> Result<Course>;
    async fn update_course(&self, id: i64, req: UpdateCourseRequest) -> Result<Option<Course>>;
    async fn deactivate_course(&self, id: i64) -> Result<bool>;
    // 选课人数最多的课程
    async fn list_top_courses(&self, limit: usize) -> Result<Vec<TopCourse>>;
    // 章节 -> 课时 -> 资料
    async fn get_course_outline(&self, course_id: i64) -> Result<Vec<ChapterOutline>>;

    /// 章节
    async fn list_chapters_with_pagination(
        &self,
        course_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<ChapterListResponse>;
    async fn get_chapter_by_id(&self, id: i64) -> Result<Option<Chapter>>;
    async fn create_chapter(&self, req: CreateChapterRequest) -> Result<Chapter>;
    async fn update_chapter(&self, id: i64, req: UpdateChapterRequest)
    -> Result<Option<Chapter>>;
    async fn deactivate_chapter(&self, id: i64) -> Result<bool>;

    /// 课时与资料
    async fn list_lessons_with_pagination(
        &self,
        chapter_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<LessonListResponse>;
    async fn get_lesson_by_id(&self, id: i64) -> Result<Option<Lesson>>;
    // 课时所属课程
    async fn get_lesson_course_id(&self, lesson_id: i64) -> Result<Option<i64>>;
    async fn create_lesson(&self, req: CreateLessonRequest) -> Result<Lesson>;
    async fn update_lesson(&self, id: i64, req: UpdateLessonRequest) -> Result<Option<Lesson>>;
    async fn deactivate_lesson(&self, id: i64) -> Result<bool>;
    async fn list_documents(&self, lesson_id: i64) -> Result<Vec<Document>>;
    async fn create_document(&self, lesson_id: i64, req: CreateDocumentRequest)
    -> Result<Document>;
    async fn deactivate_document(&self, lesson_id: i64, document_id: i64) -> Result<bool>;

    /// 选课
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment(&self, user_id: i64, course_id: i64) -> Result<Option<Enrollment>>;
    async fn create_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment>;
    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
    // user_id 为空时列出全部
    async fn list_enrollments_with_pagination(
        &self,
        user_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<EnrollmentListResponse>;
    async fn list_enrolled_courses(&self, user_id: i64) -> Result<Vec<EnrolledCourse>>;

    /// 支付
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment_by_id(&self, order_id: &str) -> Result<Option<Payment>>;
    // 在事务中确认支付并迁移选课状态，订单不存在时返回 None
    async fn confirm_payment(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Option<PaymentOutcome>>;

    /// 学习进度
    // 写入课时进度并在同一事务中重算课程进度
    async fn upsert_lesson_progress(
        &self,
        user_id: i64,
        lesson_id: i64,
        course_id: i64,
        watch_time: i64,
        completion_percentage: f64,
    ) -> Result<(LessonProgress, CourseProgress)>;
    async fn recompute_course_progress(&self, user_id: i64, course_id: i64)
    -> Result<CourseProgress>;
    async fn list_lesson_progress(&self, user_id: i64) -> Result<Vec<LessonProgress>>;
    async fn list_course_lesson_progress(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Vec<LessonProgress>>;

    /// 论坛
    async fn list_forums_with_pagination(
        &self,
        scope: ForumScope,
        page: u64,
        size: u64,
    ) -> Result<ForumListResponse>;
    async fn get_forum_by_id(&self, id: i64) -> Result<Option<Forum>>;
    async fn get_forum_by_course_id(&self, course_id: i64) -> Result<Option<Forum>>;
    async fn create_forum(&self, user_id: i64, req: CreateForumRequest) -> Result<Forum>;

    /// 主题帖
    async fn list_topics_with_pagination(
        &self,
        forum_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<TopicListResponse>;
    async fn get_topic_by_id(&self, id: i64) -> Result<Option<Topic>>;
    async fn create_topic(&self, user_id: i64, req: CreateTopicRequest) -> Result<Topic>;
    async fn update_topic(&self, id: i64, req: UpdateTopicRequest) -> Result<Option<Topic>>;
    async fn delete_topic(&self, id: i64) -> Result<bool>;
    // 浏览数 +1，不影响 last_activity
    async fn increment_topic_view(&self, id: i64) -> Result<Option<i64>>;

    /// 评论
    // 一次查询取出主题下全部有效评论
    async fn list_topic_comments(&self, topic_id: i64) -> Result<Vec<Comment>>;
    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>>;
    // 写入评论并刷新主题的 last_activity
    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;
    async fn update_comment(&self, id: i64, content: String) -> Result<Option<Comment>>;
    async fn delete_comment(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
