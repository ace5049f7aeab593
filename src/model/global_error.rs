use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 요청 검증
    MissingProjectName,
    InvalidFilter,
    InvalidPayload,
    MissingFields,
    MissingId,
    NoUpdateFields,

    // 저장소 결과
    UpdateFailed,
    DeleteFailed,
    PersistenceFailure,
}

impl ErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::MissingProjectName => "require project name for issues in URL",
            ErrorCode::InvalidFilter => "invalid filter",
            ErrorCode::InvalidPayload => "invalid request body",
            ErrorCode::MissingFields => "required field(s) missing",
            ErrorCode::MissingId => "missing _id",
            ErrorCode::NoUpdateFields => "no update field(s) sent",

            ErrorCode::UpdateFailed => "could not update",
            ErrorCode::DeleteFailed => "could not delete",
            ErrorCode::PersistenceFailure => "could not complete request",
        }
    }

    /// 기존 클라이언트 호환: 필드 누락과 해석 불가 본문만 400, 나머지는 200 + `error` 본문.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingFields |
            ErrorCode::InvalidPayload => StatusCode::BAD_REQUEST,

            ErrorCode::MissingProjectName |
            ErrorCode::InvalidFilter |
            ErrorCode::MissingId |
            ErrorCode::NoUpdateFields |
            ErrorCode::UpdateFailed |
            ErrorCode::DeleteFailed |
            ErrorCode::PersistenceFailure => StatusCode::OK,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ApiError(ErrorCode, Option<String>),

    #[error("required field(s) missing: {0:?}")]
    MissingFields(Vec<&'static str>),

    /// 수정/삭제 대상 `_id` 를 함께 돌려준다.
    #[error("{0} (_id: {1})")]
    Targeted(ErrorCode, String),
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        AppError::ApiError(code, None)
    }

    pub fn with_detail(code: ErrorCode, detail: impl Into<String>) -> Self {
        AppError::ApiError(code, Some(detail.into()))
    }

    pub fn invalid_filter(field: &str) -> Self {
        let detail = if field == "_id" {
            "Invalid _id parameter".to_string()
        } else {
            format!("Invalid {} filter", field)
        };
        AppError::with_detail(ErrorCode::InvalidFilter, detail)
    }

    pub fn targeted(code: ErrorCode, id: impl Into<String>) -> Self {
        AppError::Targeted(code, id.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::ApiError(code, _) => *code,
            AppError::MissingFields(_) => ErrorCode::MissingFields,
            AppError::Targeted(code, _) => *code,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            AppError::ApiError(code, detail) => ErrorResponse {
                error: detail.clone().unwrap_or_else(|| code.message().to_string()),
                id: None,
                missing_fields: None,
            },
            AppError::MissingFields(fields) => ErrorResponse {
                error: ErrorCode::MissingFields.message().to_string(),
                id: None,
                missing_fields: Some(fields.iter().map(|f| f.to_string()).collect()),
            },
            AppError::Targeted(code, id) => ErrorResponse {
                error: code.message().to_string(),
                id: Some(id.clone()),
                missing_fields: None,
            },
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        tracing::error!("데이터베이스 오류 발생: {}", err);
        AppError::new(ErrorCode::PersistenceFailure)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "missingFields", skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.code().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_response())
    }
}
