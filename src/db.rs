use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use crate::configuration::{DatabaseSettings, ExpirySettings};
use crate::store::IssueStore;

#[instrument(skip(settings))]
pub async fn init_db(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    info!("데이터베이스 연결 설정 중...");

    let mut options = ConnectOptions::new(settings.connection_url());
    options
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true);

    info!("데이터베이스에 연결 시도 중...");
    let db = Database::connect(options).await?;
    info!("데이터베이스 연결 완료");

    Ok(db)
}

/// `expire_marker` 가 보존 기간을 넘긴 이슈를 주기적으로 삭제한다.
pub fn spawn_expiry_sweeper<S>(store: S, settings: ExpirySettings) -> JoinHandle<()>
where
    S: IssueStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(settings.sweep_interval);
        loop {
            ticker.tick().await;
            sweep_expired(&store, settings.retention).await;
        }
    })
}

#[instrument(skip(store))]
pub async fn sweep_expired<S: IssueStore + ?Sized>(store: &S, retention: Duration) -> u64 {
    let retention = match chrono::Duration::from_std(retention) {
        Ok(retention) => retention,
        Err(e) => {
            error!("보존 기간 변환 실패: {}", e);
            return 0;
        }
    };
    let cutoff = Utc::now() - retention;

    match store.purge_expired(cutoff).await {
        Ok(0) => {
            debug!("만료된 이슈 없음");
            0
        }
        Ok(purged) => {
            info!(purged, "만료된 이슈 삭제 완료");
            purged
        }
        Err(e) => {
            error!("만료 이슈 삭제 중 오류 발생: {}", e);
            0
        }
    }
}
