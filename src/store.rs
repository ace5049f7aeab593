use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;
use crate::entity::issue::{self, ActiveModel as IssueActiveModel, Entity as IssueEntity, Model as IssueModel};

/// 목록 조회용 동등 비교 조건. 모든 조건은 AND 로 묶인다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub id: Option<Uuid>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewIssue {
    pub project_name: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueChanges {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
    pub updated_on: DateTime<Utc>,
}

impl IssueChanges {
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}

/// 이슈 컬렉션에 대한 단건 단위 연산. 각 호출은 하나의 SQL 문으로 끝난다.
#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn find(&self, project_name: &str, filter: &IssueFilter) -> Result<Vec<IssueModel>, DbErr>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<IssueModel>, DbErr>;

    async fn insert(&self, issue: NewIssue) -> Result<IssueModel, DbErr>;

    async fn update(&self, project_name: &str, id: Uuid, changes: &IssueChanges) -> Result<u64, DbErr>;

    async fn delete(&self, project_name: &str, id: Uuid) -> Result<u64, DbErr>;

    async fn delete_project(&self, project_name: &str) -> Result<u64, DbErr>;

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr>;
}

#[derive(Clone)]
pub struct SeaOrmIssueStore {
    db: DatabaseConnection,
}

impl SeaOrmIssueStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn scoped(project_name: &str, id: Uuid) -> Condition {
    Condition::all()
        .add(issue::Column::Id.eq(id))
        .add(issue::Column::ProjectName.eq(project_name))
}

#[async_trait]
impl IssueStore for SeaOrmIssueStore {
    async fn find(&self, project_name: &str, filter: &IssueFilter) -> Result<Vec<IssueModel>, DbErr> {
        let mut condition = Condition::all().add(issue::Column::ProjectName.eq(project_name));

        if let Some(id) = filter.id {
            condition = condition.add(issue::Column::Id.eq(id));
        }
        if let Some(title) = &filter.issue_title {
            condition = condition.add(issue::Column::IssueTitle.eq(title.as_str()));
        }
        if let Some(text) = &filter.issue_text {
            condition = condition.add(issue::Column::IssueText.eq(text.as_str()));
        }
        if let Some(created_by) = &filter.created_by {
            condition = condition.add(issue::Column::CreatedBy.eq(created_by.as_str()));
        }
        if let Some(assigned_to) = &filter.assigned_to {
            condition = condition.add(issue::Column::AssignedTo.eq(assigned_to.as_str()));
        }
        if let Some(status_text) = &filter.status_text {
            condition = condition.add(issue::Column::StatusText.eq(status_text.as_str()));
        }
        if let Some(open) = filter.open {
            condition = condition.add(issue::Column::Open.eq(open));
        }
        if let Some(created_on) = filter.created_on {
            condition = condition.add(issue::Column::CreatedOn.eq(created_on));
        }
        if let Some(updated_on) = filter.updated_on {
            condition = condition.add(issue::Column::UpdatedOn.eq(updated_on));
        }

        IssueEntity::find()
            .filter(condition)
            .order_by_asc(issue::Column::UpdatedOn)
            .all(&self.db)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<IssueModel>, DbErr> {
        IssueEntity::find_by_id(id).one(&self.db).await
    }

    async fn insert(&self, issue: NewIssue) -> Result<IssueModel, DbErr> {
        let new_issue = IssueActiveModel {
            id: Set(Uuid::new_v4()),
            project_name: Set(issue.project_name),
            issue_title: Set(issue.issue_title),
            issue_text: Set(issue.issue_text),
            created_by: Set(issue.created_by),
            assigned_to: Set(issue.assigned_to),
            status_text: Set(issue.status_text),
            open: Set(true),
            created_on: Set(issue.created_at),
            updated_on: Set(issue.created_at),
            expire_marker: Set(issue.created_at),
        };

        new_issue.insert(&self.db).await
    }

    async fn update(&self, project_name: &str, id: Uuid, changes: &IssueChanges) -> Result<u64, DbErr> {
        let mut query = IssueEntity::update_many()
            .col_expr(issue::Column::UpdatedOn, Expr::value(changes.updated_on));

        if let Some(title) = &changes.issue_title {
            query = query.col_expr(issue::Column::IssueTitle, Expr::value(title.clone()));
        }
        if let Some(text) = &changes.issue_text {
            query = query.col_expr(issue::Column::IssueText, Expr::value(text.clone()));
        }
        if let Some(created_by) = &changes.created_by {
            query = query.col_expr(issue::Column::CreatedBy, Expr::value(created_by.clone()));
        }
        if let Some(assigned_to) = &changes.assigned_to {
            query = query.col_expr(issue::Column::AssignedTo, Expr::value(assigned_to.clone()));
        }
        if let Some(status_text) = &changes.status_text {
            query = query.col_expr(issue::Column::StatusText, Expr::value(status_text.clone()));
        }
        if let Some(open) = changes.open {
            query = query.col_expr(issue::Column::Open, Expr::value(open));
        }

        let result = query
            .filter(scoped(project_name, id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, project_name: &str, id: Uuid) -> Result<u64, DbErr> {
        let result = IssueEntity::delete_many()
            .filter(scoped(project_name, id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_project(&self, project_name: &str) -> Result<u64, DbErr> {
        let result = IssueEntity::delete_many()
            .filter(issue::Column::ProjectName.eq(project_name))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = IssueEntity::delete_many()
            .filter(issue::Column::ExpireMarker.lt(cutoff))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
