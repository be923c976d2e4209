use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 角色
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/role.ts")]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 权限：角色在某模块下可访问的 method + path
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/role.ts")]
pub struct Permission {
    pub id: i64,
    pub role_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub path: String,
    pub method: String,
    pub module: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 允许的 HTTP 方法
pub const PERMISSION_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];
