use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use tracing::warn;
use crate::model::global_error::{AppError, ErrorCode};

/// JSON 또는 urlencoded 폼 본문. 본문이 비어 있으면 `T::default()` 로 본다.
pub struct RequestBody<T>(pub T);

impl<T> RequestBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for RequestBody<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req.content_type().to_ascii_lowercase();
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let body = body.await.map_err(|e| {
                warn!("요청 본문 읽기 실패: {}", e);
                AppError::with_detail(ErrorCode::InvalidPayload, "Invalid request body")
            })?;
            decode_body(&content_type, &body).map(RequestBody)
        })
    }
}

pub fn decode_body<T>(content_type: &str, body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let decoded = if content_type == "application/x-www-form-urlencoded" {
        serde_urlencoded::from_bytes(body).map_err(|e| e.to_string())
    } else {
        serde_json::from_slice(body).map_err(|e| e.to_string())
    };

    decoded.map_err(|e| {
        warn!("요청 본문 해석 실패: {}", e);
        AppError::with_detail(ErrorCode::InvalidPayload, format!("Invalid request body: {}", e))
    })
}
