use actix_web::{get, HttpResponse, Responder};

#[utoipa::path(
    get,
    path = "/health-check",
    summary = "서버 상태 확인",
    responses(
        (status = 200, description = "서버가 정상 동작 중", body = String, content_type = "text/plain")
    ),
    tag = "health",
)]
#[get("/health-check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}
