use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 插入内置角色 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_roles = [
            ("student", "学员，可选课、学习并参与课程论坛"),
            ("teacher", "讲师，可创建并管理自己的课程与论坛"),
            ("admin", "管理员，拥有全部权限"),
        ];

        for (name, description) in default_roles {
            let insert = Query::insert()
                .into_table(Roles::Table)
                .columns([
                    Roles::Name,
                    Roles::Description,
                    Roles::Active,
                    Roles::CreatedAt,
                    Roles::UpdatedAt,
                ])
                .values_panic([
                    name.into(),
                    description.into(),
                    true.into(),
                    now.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Name).is_in(["student", "teacher", "admin"]))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
