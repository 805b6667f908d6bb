use crate::cli::MigrateArgs;
use crate::config::ProjectConfig;
use crate::db;
use anyhow::Context;
use jobly::migrate::Target;

pub async fn run(args: MigrateArgs, config: Option<&ProjectConfig>) -> anyhow::Result<()> {
    if args.dry_run {
        let selected: Vec<_> = jobly::migrate::migrations()
            .into_iter()
            .filter(|m| args.to.is_none_or(|to| m.version() <= to))
            .collect();
        if selected.is_empty() {
            println!("no embedded migrations selected");
        } else {
            println!("embedded migrations (dry-run):");
            for m in selected {
                println!("  V{}__{}", m.version(), m.name());
            }
        }
        return Ok(());
    }

    let pool = db::connect_pool(&args.conn, config)?;
    let mut client = pool.get().await.context("failed to get a database connection")?;

    let target = match args.to {
        Some(v) => Target::Version(v),
        None => Target::Latest,
    };
    let report = jobly::migrate::run_to(&mut client, target).await?;

    let applied = report.applied_migrations();
    println!("applied {} migration(s)", applied.len());
    for m in applied {
        println!("  {}", m);
    }
    Ok(())
}
