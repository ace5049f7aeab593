use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use crate::entity::issue::Model as IssueModel;

/// 목록 조회 필터. 여기 선언된 키만 받고 나머지 쿼리 파라미터는 무시된다.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssueQuery {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    /// "true" 또는 "false"
    pub open: Option<String>,
    pub created_on: Option<String>,
    pub updated_on: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateIssueRequest {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

/// 폼 요청은 문자열, JSON 요청은 boolean 으로 올 수 있다.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum OpenField {
    Flag(bool),
    Text(String),
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<OpenField>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssueResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub project_name: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl From<IssueModel> for IssueResponse {
    fn from(model: IssueModel) -> Self {
        Self {
            id: model.id,
            project_name: model.project_name,
            issue_title: model.issue_title,
            issue_text: model.issue_text,
            created_by: model.created_by,
            assigned_to: model.assigned_to,
            status_text: model.status_text,
            open: model.open,
            created_on: model.created_on,
            updated_on: model.updated_on,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedIssueResponse {
    pub result: String,
    #[serde(flatten)]
    pub issue: IssueResponse,
}

impl From<IssueModel> for UpdatedIssueResponse {
    fn from(model: IssueModel) -> Self {
        Self {
            result: "successfully updated".to_string(),
            issue: IssueResponse::from(model),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedIssueResponse {
    pub result: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl DeletedIssueResponse {
    pub fn new(id: String) -> Self {
        Self {
            result: "successfully deleted".to_string(),
            id,
        }
    }
}
