use crate::cli::ConnArgs;
use crate::config::ProjectConfig;
use anyhow::Context;
use jobly::pool::DEFAULT_POOL_SIZE;

/// Database URL from `--database`, then the config file, then `DATABASE_URL`.
pub fn resolve_database(conn: &ConnArgs, config: Option<&ProjectConfig>) -> anyhow::Result<String> {
    if let Some(v) = &conn.database {
        return Ok(v.clone());
    }
    if let Some(cfg) = config {
        return Ok(cfg.file.database.url.clone());
    }
    if let Ok(v) = std::env::var("DATABASE_URL") {
        return Ok(v);
    }
    anyhow::bail!(
        "database URL is required: pass --database, set DATABASE_URL or provide {}",
        conn.config.display()
    )
}

pub fn connect_pool(
    conn: &ConnArgs,
    config: Option<&ProjectConfig>,
) -> anyhow::Result<deadpool_postgres::Pool> {
    let database_url = resolve_database(conn, config)?;
    let pool_size = config.map_or(DEFAULT_POOL_SIZE, |c| c.file.database.pool_size);
    jobly::create_pool_with_config(&database_url, pool_size)
        .context("failed to create connection pool")
}
