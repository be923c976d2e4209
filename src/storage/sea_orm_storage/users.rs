use super::SeaOrmStorage;
use crate::entity::roles::{self, Entity as Roles};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 按角色名查找角色 ID
    async fn resolve_role_id(&self, role: &UserRole) -> Result<i64> {
        let found = Roles::find()
            .filter(roles::Column::Name.eq(role.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询角色失败: {e}")))?;

        found
            .map(|r| r.id)
            .ok_or_else(|| CourseHubError::not_found(format!("角色不存在: {role}")))
    }

    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let role_id = self.resolve_role_id(&req.role).await?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role_id: Set(Some(role_id)),
            status: Set(UserStatus::Active.to_string()),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            avatar_url: Set(req.avatar_url),
            phone: Set(req.phone),
            address: Set(req.address),
            introduce: Set(req.introduce),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建用户失败: {e}")))?;

        self.get_user_by_id_impl(result.id)
            .await?
            .ok_or_else(|| CourseHubError::database_operation("创建用户后读取失败"))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .find_also_related(Roles)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|(m, role)| m.into_user(role)))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .find_also_related(Roles)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|(m, role)| m.into_user(role)))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .find_also_related(Roles)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|(m, role)| m.into_user(role)))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .find_also_related(Roles)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|(m, role)| m.into_user(role)))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find().find_also_related(Roles);

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(roles::Column::Name.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users
                .into_iter()
                .map(|(m, role)| m.into_user(role))
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 列出活跃讲师
    pub async fn list_teachers_impl(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .find_also_related(Roles)
            .filter(roles::Column::Name.eq(UserRole::TEACHER))
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询讲师列表失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|(m, role)| m.into_user(role))
            .collect())
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CourseHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role_id = Set(Some(self.resolve_role_id(&role).await?));
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(first_name) = update.first_name {
            model.first_name = Set(Some(first_name));
        }

        if let Some(last_name) = update.last_name {
            model.last_name = Set(Some(last_name));
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }

        if let Some(introduce) = update.introduce {
            model.introduce = Set(Some(introduce));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use super::*;

    #[tokio::test]
    async fn test_create_user_resolves_role() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        assert_eq!(user.role, Some(UserRole::Teacher));
        assert!(user.role_id.is_some());

        let found = storage
            .get_user_by_username_or_email_impl("teacher01@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_list_teachers_and_role_filter() {
        let storage = memory_storage().await;
        seed_user(&storage, "teacher01", UserRole::Teacher).await;
        seed_user(&storage, "student01", UserRole::Student).await;
        seed_user(&storage, "student02", UserRole::Student).await;

        let teachers = storage.list_teachers_impl().await.unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].username, "teacher01");

        let students = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Student),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(students.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_update_role_and_profile() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "student01", UserRole::Student).await;
        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    role: Some(UserRole::Teacher),
                    first_name: Some("Lan".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Some(UserRole::Teacher));
        assert_eq!(updated.profile.first_name.as_deref(), Some("Lan"));
        assert!(storage.update_user_impl(9999, UpdateUserRequest::default()).await.unwrap().is_none());
    }
}
