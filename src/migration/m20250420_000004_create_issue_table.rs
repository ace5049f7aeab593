use sea_orm::Schema;
use sea_orm_migration::prelude::*;
use crate::entity::issue::{Column, Entity};

const IDX_EXPIRE_MARKER: &str = "idx_issues_expire_marker";
const IDX_PROJECT_UPDATED_ON: &str = "idx_issues_project_name_updated_on";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {

    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        manager
            .create_table(
                schema
                    .create_table_from_entity(Entity)
                    .if_not_exists()
                    .to_owned()
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_EXPIRE_MARKER)
                    .table(Entity)
                    .col(Column::ExpireMarker)
                    .to_owned()
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_PROJECT_UPDATED_ON)
                    .table(Entity)
                    .col(Column::ProjectName)
                    .col(Column::UpdatedOn)
                    .to_owned()
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entity).to_owned())
            .await
    }
}
