use actix_web::{delete, get, post, put, web, HttpResponse};
use crate::api::payload::RequestBody;
use crate::model::global_error::{AppError, ErrorResponse};
use crate::model::issue::{
    CreateIssueRequest, DeleteIssueRequest, DeletedIssueResponse, IssueQuery, IssueResponse,
    UpdateIssueRequest, UpdatedIssueResponse,
};
use crate::service::IssueService;
use crate::store::SeaOrmIssueStore;

pub type Issues = IssueService<SeaOrmIssueStore>;

#[utoipa::path(
    get,
    path = "/api/issues/{project}",
    summary = "프로젝트 이슈 목록 조회",
    params(
        ("project" = String, Path, description = "프로젝트 이름"),
        IssueQuery,
    ),
    responses(
        (status = 200, description = "updated_on 오름차순 이슈 목록, 또는 필터 오류", body = Vec<IssueResponse>),
    ),
    tag = "issues",
)]
#[get("/issues/{project}")]
pub async fn list_issues(
    path: web::Path<String>,
    query: web::Query<IssueQuery>,
    issues: web::Data<Issues>,
) -> Result<HttpResponse, AppError> {
    let project_name = path.into_inner();

    let response: Vec<IssueResponse> = issues
        .list(&project_name, query.into_inner())
        .await?
        .into_iter()
        .map(IssueResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/issues/{project}",
    summary = "이슈 생성",
    params(
        ("project" = String, Path, description = "프로젝트 이름"),
    ),
    request_body = CreateIssueRequest,
    responses(
        (status = 200, description = "이슈 생성 성공", body = IssueResponse),
        (status = 400, description = "필수 필드 누락 또는 해석할 수 없는 본문", body = ErrorResponse),
    ),
    tag = "issues",
)]
#[post("/issues/{project}")]
pub async fn create_issue(
    path: web::Path<String>,
    body: RequestBody<CreateIssueRequest>,
    issues: web::Data<Issues>,
) -> Result<HttpResponse, AppError> {
    let project_name = path.into_inner();

    let issue = issues.create(&project_name, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(IssueResponse::from(issue)))
}

#[utoipa::path(
    put,
    path = "/api/issues/{project}",
    summary = "이슈 수정",
    params(
        ("project" = String, Path, description = "프로젝트 이름"),
    ),
    request_body = UpdateIssueRequest,
    responses(
        (status = 200, description = "수정된 이슈, 또는 `{error, _id}`", body = UpdatedIssueResponse),
        (status = 400, description = "해석할 수 없는 본문", body = ErrorResponse),
    ),
    tag = "issues",
)]
#[put("/issues/{project}")]
pub async fn update_issue(
    path: web::Path<String>,
    body: RequestBody<UpdateIssueRequest>,
    issues: web::Data<Issues>,
) -> Result<HttpResponse, AppError> {
    let project_name = path.into_inner();

    let issue = issues.update(&project_name, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UpdatedIssueResponse::from(issue)))
}

#[utoipa::path(
    delete,
    path = "/api/issues/{project}",
    summary = "이슈 삭제",
    params(
        ("project" = String, Path, description = "프로젝트 이름"),
    ),
    request_body = DeleteIssueRequest,
    responses(
        (status = 200, description = "삭제 결과, 또는 `{error, _id}`", body = DeletedIssueResponse),
        (status = 400, description = "해석할 수 없는 본문", body = ErrorResponse),
    ),
    tag = "issues",
)]
#[delete("/issues/{project}")]
pub async fn delete_issue(
    path: web::Path<String>,
    body: RequestBody<DeleteIssueRequest>,
    issues: web::Data<Issues>,
) -> Result<HttpResponse, AppError> {
    let project_name = path.into_inner();

    let id = issues.delete(&project_name, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DeletedIssueResponse::new(id)))
}
