//! Connection pool construction.

use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Default maximum number of pooled connections.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Create a pool for `database_url` with [`DEFAULT_POOL_SIZE`] connections.
///
/// ```ignore
/// let pool = jobly::create_pool("postgres://localhost/jobly")?;
/// let client = pool.get().await?;
/// let jobs = jobly::job::find_all(&client).await?;
/// ```
pub fn create_pool(database_url: &str) -> JoblyResult<Pool> {
    create_pool_with_config(database_url, DEFAULT_POOL_SIZE)
}

/// Create a pool holding at most `max_size` connections.
pub fn create_pool_with_config(database_url: &str, max_size: usize) -> JoblyResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        let err = create_pool("postgres://user@host:notaport/db").unwrap_err();
        assert!(matches!(err, JoblyError::Connection(_)));
    }

    #[test]
    fn builds_without_connecting() {
        let pool = create_pool_with_config("postgres://localhost/jobly", 4).unwrap();
        assert_eq!(pool.status().max_size, 4);
    }
}
