use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 注册请求（学员 / 讲师）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/user.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub introduce: Option<String>,
    pub avatar_url: Option<String>,
}

// 用户创建请求（存储层，password 为哈希值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub introduce: Option<String>,
    pub avatar_url: Option<String>,
}

impl CreateUserRequest {
    pub fn from_register(req: RegisterRequest, password_hash: String, role: UserRole) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: password_hash,
            role,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            address: req.address,
            introduce: req.introduce,
            avatar_url: req.avatar_url,
        }
    }
}

// 管理员创建用户请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/user.ts")]
pub struct AdminCreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub introduce: Option<String>,
    pub avatar_url: Option<String>,
}

impl AdminCreateUserRequest {
    pub fn into_create(self, password_hash: String) -> CreateUserRequest {
        CreateUserRequest {
            username: self.username,
            email: self.email,
            password: password_hash,
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            address: self.address,
            introduce: self.introduce,
            avatar_url: self.avatar_url,
        }
    }
}

// 用户更新请求（管理员）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../bindings/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub introduce: Option<String>,
    pub avatar_url: Option<String>,
}

// 当前用户资料更新请求（不允许修改角色与状态）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/user.ts")]
pub struct UpdateCurrentUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub introduce: Option<String>,
    pub avatar_url: Option<String>,
}

impl UpdateCurrentUserRequest {
    /// 转换为存储层更新请求，password 需已哈希
    pub fn into_update(self, hashed_password: Option<String>) -> UpdateUserRequest {
        UpdateUserRequest {
            email: self.email,
            password: hashed_password,
            role: None,
            status: None,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            address: self.address,
            introduce: self.introduce,
            avatar_url: self.avatar_url,
        }
    }
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}
