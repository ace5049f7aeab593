use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use crate::entity::issue::Model as IssueModel;
use crate::model::global_error::{AppError, ErrorCode};
use crate::model::issue::{CreateIssueRequest, DeleteIssueRequest, IssueQuery, OpenField, UpdateIssueRequest};
use crate::store::{IssueChanges, IssueFilter, IssueStore, NewIssue};

pub struct IssueService<S> {
    store: S,
    fixture_project: Option<String>,
}

impl<S: IssueStore> IssueService<S> {
    pub fn new(store: S, fixture_project: Option<String>) -> Self {
        Self { store, fixture_project }
    }

    #[instrument(skip(self, query))]
    pub async fn list(&self, project_name: &str, query: IssueQuery) -> Result<Vec<IssueModel>, AppError> {
        require_project(project_name)?;
        let filter = build_filter(query)?;

        let issues = self.store.find(project_name, &filter).await?;
        Ok(issues)
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, project_name: &str, request: CreateIssueRequest) -> Result<IssueModel, AppError> {
        require_project(project_name)?;

        let issue_title = present(request.issue_title);
        let issue_text = present(request.issue_text);
        let created_by = present(request.created_by);

        let (issue_title, issue_text, created_by) = match (issue_title, issue_text, created_by) {
            (Some(title), Some(text), Some(author)) => (title, text, author),
            (title, text, author) => {
                let missing: Vec<&'static str> = [
                    ("issue_title", title.is_none()),
                    ("issue_text", text.is_none()),
                    ("created_by", author.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, is_missing)| is_missing.then_some(field))
                .collect();
                return Err(AppError::MissingFields(missing));
            }
        };

        if self.fixture_project.as_deref() == Some(project_name) {
            let purged = self.store.delete_project(project_name).await.map_err(|e| {
                error!("픽스처 프로젝트 초기화 중 오류 발생: {}", e);
                AppError::with_detail(ErrorCode::PersistenceFailure, "could not create issue")
            })?;
            info!(purged, "픽스처 프로젝트 초기화");
        }

        let new_issue = NewIssue {
            project_name: project_name.to_string(),
            issue_title,
            issue_text,
            created_by,
            assigned_to: request.assigned_to.unwrap_or_default(),
            status_text: request.status_text.unwrap_or_default(),
            created_at: Utc::now(),
        };

        self.store.insert(new_issue).await.map_err(|e| {
            error!("이슈 저장 중 오류 발생: {}", e);
            AppError::with_detail(ErrorCode::PersistenceFailure, "could not create issue")
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, project_name: &str, request: UpdateIssueRequest) -> Result<IssueModel, AppError> {
        let raw_id = present(request.id).ok_or_else(|| AppError::new(ErrorCode::MissingId))?;

        let changes = IssueChanges {
            issue_title: present(request.issue_title),
            issue_text: present(request.issue_text),
            created_by: present(request.created_by),
            assigned_to: present(request.assigned_to),
            status_text: present(request.status_text),
            open: request.open.and_then(coerce_open),
            updated_on: Utc::now(),
        };

        if changes.is_empty() {
            return Err(AppError::targeted(ErrorCode::NoUpdateFields, raw_id));
        }

        let update_failed = || AppError::targeted(ErrorCode::UpdateFailed, raw_id.clone());
        let id = Uuid::parse_str(&raw_id).map_err(|_| update_failed())?;

        let modified = self.store.update(project_name, id, &changes).await.map_err(|e| {
            error!("이슈 수정 중 오류 발생: {}", e);
            update_failed()
        })?;

        if modified == 0 {
            warn!(%id, "수정할 이슈를 찾지 못함");
            return Err(update_failed());
        }

        self.store
            .find_by_id(id)
            .await
            .map_err(|e| {
                error!("수정된 이슈 조회 중 오류 발생: {}", e);
                update_failed()
            })?
            .ok_or_else(update_failed)
    }

    #[instrument(skip(self, request))]
    pub async fn delete(&self, project_name: &str, request: DeleteIssueRequest) -> Result<String, AppError> {
        let raw_id = present(request.id).ok_or_else(|| AppError::new(ErrorCode::MissingId))?;

        let delete_failed = || AppError::targeted(ErrorCode::DeleteFailed, raw_id.clone());
        let id = Uuid::parse_str(&raw_id).map_err(|_| delete_failed())?;

        let deleted = self.store.delete(project_name, id).await.map_err(|e| {
            error!("이슈 삭제 중 오류 발생: {}", e);
            delete_failed()
        })?;

        if deleted == 0 {
            warn!(%id, "삭제할 이슈를 찾지 못함");
            return Err(delete_failed());
        }

        Ok(raw_id)
    }
}

fn require_project(project_name: &str) -> Result<(), AppError> {
    if project_name.trim().is_empty() {
        return Err(AppError::new(ErrorCode::MissingProjectName));
    }
    Ok(())
}

/// 빈 문자열은 "보내지 않음" 으로 본다.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// "false" 만 false, 그 외 값은 모두 true
fn coerce_open(value: OpenField) -> Option<bool> {
    match value {
        OpenField::Flag(flag) => Some(flag),
        OpenField::Text(text) if text.is_empty() => None,
        OpenField::Text(text) => Some(text != "false"),
    }
}

fn build_filter(query: IssueQuery) -> Result<IssueFilter, AppError> {
    let id = present(query.id)
        .map(|raw| Uuid::parse_str(&raw).map_err(|_| AppError::invalid_filter("_id")))
        .transpose()?;

    let open = match present(query.open).as_deref() {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(_) => return Err(AppError::invalid_filter("open")),
    };

    let created_on = present(query.created_on)
        .map(|raw| parse_timestamp(&raw).ok_or_else(|| AppError::invalid_filter("created_on")))
        .transpose()?;
    let updated_on = present(query.updated_on)
        .map(|raw| parse_timestamp(&raw).ok_or_else(|| AppError::invalid_filter("updated_on")))
        .transpose()?;

    Ok(IssueFilter {
        id,
        issue_title: present(query.issue_title),
        issue_text: present(query.issue_text),
        created_by: present(query.created_by),
        assigned_to: present(query.assigned_to),
        status_text: present(query.status_text),
        open,
        created_on,
        updated_on,
    })
}

/// RFC 3339, 시간대 없는 `YYYY-MM-DDTHH:MM:SS[.f]`(UTC), `YYYY-MM-DD`(UTC 자정) 를 받는다.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
