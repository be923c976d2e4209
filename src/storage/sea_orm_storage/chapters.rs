//! 章节存储操作

use super::SeaOrmStorage;
use crate::entity::chapters::{ActiveModel, Column, Entity as Chapters};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    chapters::{
        entities::Chapter,
        requests::{CreateChapterRequest, UpdateChapterRequest},
        responses::ChapterListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn list_chapters_with_pagination_impl(
        &self,
        course_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<ChapterListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = Chapters::find().filter(Column::Active.eq(true));
        if let Some(course_id) = course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        select = select.order_by_asc(Column::CourseId).order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询章节总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询章节页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询章节列表失败: {e}")))?;

        Ok(ChapterListResponse {
            items: items.into_iter().map(|m| m.into_chapter()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn get_chapter_by_id_impl(&self, id: i64) -> Result<Option<Chapter>> {
        let result = Chapters::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询章节失败: {e}")))?;

        Ok(result.map(|m| m.into_chapter()))
    }

    pub async fn create_chapter_impl(&self, req: CreateChapterRequest) -> Result<Chapter> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            name: Set(req.name),
            description: Set(req.description),
            is_published: Set(req.is_published),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建章节失败: {e}")))?;

        Ok(result.into_chapter())
    }

    pub async fn update_chapter_impl(
        &self,
        id: i64,
        req: UpdateChapterRequest,
    ) -> Result<Option<Chapter>> {
        if self.get_chapter_by_id_impl(id).await?.is_none() {
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
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(is_published) = req.is_published {
            model.is_published = Set(is_published);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新章节失败: {e}")))?;

        self.get_chapter_by_id_impl(id).await
    }

    pub async fn deactivate_chapter_impl(&self, id: i64) -> Result<bool> {
        let result = Chapters::update_many()
            .col_expr(Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("停用章节失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
