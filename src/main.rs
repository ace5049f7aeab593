use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use issue_tracker::api::{self, ApiDoc};
use issue_tracker::configuration::Settings;
use issue_tracker::db::{init_db, spawn_expiry_sweeper};
use issue_tracker::migration::{Migrator, MigratorTrait};
use issue_tracker::service::IssueService;
use issue_tracker::store::SeaOrmIssueStore;
use issue_tracker::telemetry::{get_subscriber, init_subscriber};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "issue_tracker".into(),
        "info,sqlx=warn".into(),
        std::io::stdout
    );
    init_subscriber(subscriber)?;

    info!("애플리케이션 시작 중...");

    let settings = Settings::from_env()?;
    info!("환경 변수 로드 완료");

    let db = init_db(&settings.database).await?;
    info!("데이터베이스 마이그레이션 실행 중...");
    Migrator::up(&db, None).await?;
    info!("마이그레이션 완료");

    let store = SeaOrmIssueStore::new(db);
    spawn_expiry_sweeper(store.clone(), settings.expiry.clone());

    if let Some(project) = &settings.fixture_project {
        info!("픽스처 프로젝트 초기화 활성화: {}", project);
    }
    let issues = Data::new(IssueService::new(store, settings.fixture_project.clone()));

    let address = (settings.application.host.clone(), settings.application.port);
    info!("서버 시작 중: http://{}:{}", address.0, address.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(issues.clone())
            .configure(api::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi())
            )
    })
        .bind(address)?
        .run()
        .await?;

    Ok(())
}
