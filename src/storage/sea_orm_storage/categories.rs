//! 课程分类存储操作

use super::SeaOrmStorage;
use crate::entity::categories::{ActiveModel, Column, Entity as Categories};
use crate::errors::{CourseHubError, Result};
use crate::models::categories::{
    entities::Category,
    requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出有效分类
    pub async fn list_categories_impl(&self) -> Result<Vec<Category>> {
        let items = Categories::find()
            .filter(Column::Active.eq(true))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询分类列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_category()).collect())
    }

    pub async fn get_category_by_id_impl(&self, id: i64) -> Result<Option<Category>> {
        let item = Categories::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询分类失败: {e}")))?;

        Ok(item.map(|m| m.into_category()))
    }

    pub async fn create_category_impl(&self, req: CreateCategoryRequest) -> Result<Category> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            image_url: Set(req.image_url),
            description: Set(req.description),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建分类失败: {e}")))?;

        Ok(result.into_category())
    }

    pub async fn update_category_impl(
        &self,
        id: i64,
        req: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        if self.get_category_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = req.name {
            model.name = Set(name);
        }

        if let Some(image_url) = req.image_url {
            model.image_url = Set(Some(image_url));
        }

        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新分类失败: {e}")))?;

        self.get_category_by_id_impl(id).await
    }

    /// 停用分类
    pub async fn deactivate_category_impl(&self, id: i64) -> Result<bool> {
        let result = Categories::update_many()
            .col_expr(Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("停用分类失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
