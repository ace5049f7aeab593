use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_name: String,
    pub issue_title: String,
    #[sea_orm(column_type = "Text")]
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: DateTimeUtc,
    pub updated_on: DateTimeUtc,
    // 만료 스위퍼 전용, 클라이언트에 노출하지 않음
    pub expire_marker: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
