//! 数据模型
//!
//! 每个资源分为 `entities`（业务实体）、`requests`（请求体/查询参数）与 `responses`（响应体）。

pub mod auth;
pub mod categories;
pub mod chapters;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod forums;
pub mod lessons;
pub mod payments;
pub mod progress;
pub mod roles;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 `ApiResponse.code` 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用 1000-1999
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1007,

    // 认证 2000-2099
    AuthFailed = 2000,
    RegisterFailed = 2001,
    OtpInvalid = 2002,
    PasswordMismatch = 2003,

    // 用户 2100-2199
    UserNotFound = 2100,
    UserNameInvalid = 2101,
    UserEmailInvalid = 2102,
    UserPasswordInvalid = 2103,
    UserPhoneInvalid = 2104,
    UserNameAlreadyExists = 2105,
    UserEmailAlreadyExists = 2106,
    UserUpdateFailed = 2107,
    UserDeleteFailed = 2108,
    CanNotDeleteCurrentUser = 2109,

    // 角色与权限 2200-2299
    RoleNotFound = 2200,
    RoleAlreadyExists = 2201,
    PermissionNotFound = 2202,

    // 课程目录 3000-3099
    CategoryNotFound = 3000,
    CourseNotFound = 3001,
    CoursePermissionDenied = 3002,
    ChapterNotFound = 3003,
    LessonNotFound = 3004,
    DocumentNotFound = 3005,

    // 选课 4000-4099
    EnrollmentNotFound = 4000,
    EnrollmentAlreadyActive = 4001,
    EnrollmentInactive = 4002,
    NotEnrolled = 4003,
    OnlyStudentCanEnroll = 4004,

    // 支付 4100-4199
    PaymentNotFound = 4100,
    PaymentGatewayError = 4101,
    InvalidSignature = 4102,

    // 学习进度 4200-4299
    InvalidProgress = 4200,

    // 论坛 5000-5099
    ForumNotFound = 5000,
    ForumAlreadyExists = 5001,
    ForumAccessDenied = 5002,
    ForumLocked = 5003,
    TopicNotFound = 5004,
    TopicLocked = 5005,
    CommentNotFound = 5006,
    CommentParentInvalid = 5007,
}
