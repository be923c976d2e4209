//! 角色与权限存储操作

use super::SeaOrmStorage;
use crate::entity::permissions::{self, Entity as Permissions};
use crate::entity::roles::{ActiveModel, Column, Entity as Roles};
use crate::errors::{CourseHubError, Result};
use crate::models::roles::{
    entities::{Permission, Role},
    requests::{CreatePermissionRequest, CreateRoleRequest, UpdateRoleRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn list_roles_impl(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询角色列表失败: {e}")))?;

        Ok(roles.into_iter().map(|m| m.into_role()).collect())
    }

    pub async fn get_role_by_id_impl(&self, id: i64) -> Result<Option<Role>> {
        let role = Roles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(role.map(|m| m.into_role()))
    }

    pub async fn get_role_by_name_impl(&self, name: &str) -> Result<Option<Role>> {
        let role = Roles::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(role.map(|m| m.into_role()))
    }

    pub async fn create_role_impl(&self, req: CreateRoleRequest) -> Result<Role> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_ascii_lowercase()),
            description: Set(req.description),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建角色失败: {e}")))?;

        Ok(result.into_role())
    }

    pub async fn update_role_impl(&self, id: i64, req: UpdateRoleRequest) -> Result<Option<Role>> {
        if self.get_role_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = req.name {
            model.name = Set(name.trim().to_ascii_lowercase());
        }

        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }

        if let Some(active) = req.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新角色失败: {e}")))?;

        self.get_role_by_id_impl(id).await
    }

    /// 删除角色，users.role_id 由外键置空，权限级联删除
    pub async fn delete_role_impl(&self, id: i64) -> Result<bool> {
        let result = Roles::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_permissions_impl(&self, role_id: i64) -> Result<Vec<Permission>> {
        let items = Permissions::find()
            .filter(permissions::Column::RoleId.eq(role_id))
            .order_by_asc(permissions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询权限列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_permission()).collect())
    }

    pub async fn create_permission_impl(
        &self,
        role_id: i64,
        req: CreatePermissionRequest,
    ) -> Result<Permission> {
        let now = chrono::Utc::now().timestamp();

        let model = permissions::ActiveModel {
            role_id: Set(role_id),
            name: Set(req.name),
            description: Set(req.description),
            path: Set(req.path),
            method: Set(req.method.to_ascii_uppercase()),
            module: Set(req.module),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建权限失败: {e}")))?;

        Ok(result.into_permission())
    }

    pub async fn delete_permission_impl(&self, role_id: i64, permission_id: i64) -> Result<bool> {
        let result = Permissions::delete_many()
            .filter(permissions::Column::Id.eq(permission_id))
            .filter(permissions::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除权限失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::roles::requests::{CreatePermissionRequest, CreateRoleRequest};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_seeded_roles_exist() {
        let storage = memory_storage().await;
        let roles = storage.list_roles_impl().await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"student"));
        assert!(names.contains(&"teacher"));
        assert!(names.contains(&"admin"));
    }

    #[tokio::test]
    async fn test_delete_role_nulls_user_role() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let role_id = user.role_id.unwrap();

        assert!(storage.delete_role_impl(role_id).await.unwrap());

        let reloaded = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.role_id, None);
        assert_eq!(reloaded.role, None);
    }

    #[tokio::test]
    async fn test_permissions_scoped_to_role() {
        let storage = memory_storage().await;
        let role = storage
            .create_role_impl(CreateRoleRequest {
                name: "Moderator".into(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(role.name, "moderator");

        let permission = storage
            .create_permission_impl(
                role.id,
                CreatePermissionRequest {
                    name: "lock topic".into(),
                    description: None,
                    path: "/api/v1/topics/{id}".into(),
                    method: "put".into(),
                    module: "forum".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(permission.method, "PUT");

        assert!(!storage.delete_permission_impl(role.id + 1, permission.id).await.unwrap());
        assert!(storage.delete_permission_impl(role.id, permission.id).await.unwrap());
        assert!(storage.list_permissions_impl(role.id).await.unwrap().is_empty());
    }
}
