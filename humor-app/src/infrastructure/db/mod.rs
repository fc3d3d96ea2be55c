pub mod entities;
mod catalog_repository;
mod vote_repository;

pub use catalog_repository::CatalogRepository;
pub use vote_repository::VoteRepository;

use crate::application::StoreError;
use sea_orm::{ConnAcquireErr, ConnectOptions, Database, DatabaseConnection, DbErr};
use std::future::Future;
use std::time::Duration;

pub async fn create_connection(database_url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
            StoreError::Timeout("timed out acquiring a database connection".to_string())
        }
        DbErr::ConnectionAcquire(e) => StoreError::Unreachable(e.to_string()),
        DbErr::Conn(e) => StoreError::Unreachable(e.to_string()),
        other => StoreError::Other(other.to_string()),
    }
}

/// Runs one store call under the request deadline, leaving the `DbErr` to
/// the caller.
pub(crate) async fn with_deadline<T, F>(deadline: Duration, op: &str, fut: F) -> Result<Result<T, DbErr>, StoreError>
where
    F: Future<Output = Result<T, DbErr>>,
{
    tokio::time::timeout(deadline, fut).await.map_err(|_| {
        tracing::warn!(op, deadline_ms = deadline.as_millis() as u64, "Store call timed out");
        StoreError::Timeout(format!("{op} took longer than {}ms", deadline.as_millis()))
    })
}

pub(crate) async fn bounded<T, F>(deadline: Duration, op: &str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, DbErr>>,
{
    with_deadline(deadline, op, fut).await?.map_err(store_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_maps_to_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, DbErr>(())
        };
        let err = bounded(Duration::from_millis(10), "select captions", slow).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            store_error(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)),
            StoreError::Timeout(_)
        ));
        assert!(matches!(
            store_error(DbErr::RecordNotUpdated),
            StoreError::Other(_)
        ));
    }
}
