//! Embedded schema migrations via [`refinery`].
//!
//! The `companies` and `jobs` tables ship inside the crate, so a binary can
//! bring an empty database up to date without a migrations directory on disk.
//!
//! ```ignore
//! let pool = jobly::create_pool(&database_url)?;
//! let report = jobly::migrate::run_pool(&pool).await?;
//! ```

use crate::error::JoblyResult;

pub use refinery::{Migration, Report, SchemaVersion, Target};

mod embedded {
    refinery::embed_migrations!("./migrations");
}

/// Migrations compiled into this crate, in version order.
pub fn migrations() -> Vec<Migration> {
    let mut migrations = embedded::migrations::runner().get_migrations().to_vec();
    migrations.sort_by_key(Migration::version);
    migrations
}

/// Apply every pending migration.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    run_to(client, Target::Latest).await
}

/// Apply pending migrations up to `target`.
pub async fn run_to(client: &mut tokio_postgres::Client, target: Target) -> JoblyResult<Report> {
    let report = embedded::migrations::runner()
        .set_target(target)
        .run_async(client)
        .await?;
    for m in report.applied_migrations() {
        tracing::info!(version = m.version(), name = m.name(), "migration applied");
    }
    Ok(report)
}

/// Pool variant of [`run`].
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_migrations_are_ordered() {
        let names: Vec<(SchemaVersion, String)> = migrations()
            .iter()
            .map(|m| (m.version(), m.name().to_string()))
            .collect();
        assert_eq!(
            names,
            vec![(1, "create_companies".to_string()), (2, "create_jobs".to_string())]
        );
    }
}
