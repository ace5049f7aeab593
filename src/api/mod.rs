mod health;
mod issue;
mod payload;

use actix_web::error::QueryPayloadError;
use actix_web::web::{self, scope};
use actix_web::HttpRequest;
use tracing::warn;
use utoipa::OpenApi;
use crate::model::global_error::{AppError, ErrorCode};

pub use crate::api::health::health_check;
pub use crate::api::issue::{create_issue, delete_issue, list_issues, update_issue, Issues};
pub use crate::api::payload::RequestBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        issue::list_issues,
        issue::create_issue,
        issue::update_issue,
        issue::delete_issue,
    ),
    components(schemas(
        crate::model::issue::CreateIssueRequest,
        crate::model::issue::UpdateIssueRequest,
        crate::model::issue::DeleteIssueRequest,
        crate::model::issue::OpenField,
        crate::model::issue::IssueResponse,
        crate::model::issue::UpdatedIssueResponse,
        crate::model::issue::DeletedIssueResponse,
        crate::model::global_error::ErrorResponse,
    )),
    tags(
        (name = "issues", description = "프로젝트별 이슈 CRUD"),
        (name = "health", description = "상태 확인"),
    ),
)]
pub struct ApiDoc;

// 중복 키 등 serde_urlencoded 가 거부한 쿼리도 `{error}` 본문으로 돌려준다.
fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("쿼리 해석 실패 ({}): {}", req.query_string(), err);
    AppError::with_detail(ErrorCode::InvalidFilter, "Invalid query parameters").into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health_check)
        .service(
            scope("/api")
                .service(list_issues)
                .service(create_issue)
                .service(update_issue)
                .service(delete_issue),
        );
}
