use crate::cli::{ActorArgs, JobsCommand};
use crate::config::ProjectConfig;
use crate::db;
use anyhow::Context;
use jobly::api::{ApiResponse, jobs};
use jobly::Actor;
use serde_json::Value;
use std::io::Read;

pub async fn run(cmd: JobsCommand, config: Option<&ProjectConfig>) -> anyhow::Result<()> {
    let response = match cmd {
        JobsCommand::List(args) => {
            let pool = db::connect_pool(&args.conn, config)?;
            let client = pool.get().await.context("failed to get a database connection")?;
            jobs::list(&client, &args.query).await
        }
        JobsCommand::Get(args) => {
            let pool = db::connect_pool(&args.conn, config)?;
            let client = pool.get().await.context("failed to get a database connection")?;
            jobs::get(&client, &args.id).await
        }
        JobsCommand::Create(args) => {
            let actor = resolve_actor(&args.actor, config);
            let body = read_body(&args.body)?;
            let pool = db::connect_pool(&args.conn, config)?;
            let client = pool.get().await.context("failed to get a database connection")?;
            jobs::create(&client, &actor, &body).await
        }
        JobsCommand::Update(args) => {
            let actor = resolve_actor(&args.actor, config);
            let body = read_body(&args.body)?;
            let pool = db::connect_pool(&args.conn, config)?;
            let client = pool.get().await.context("failed to get a database connection")?;
            jobs::update(&client, &actor, &args.id, &body).await
        }
        JobsCommand::Delete(args) => {
            let actor = resolve_actor(&args.actor, config);
            let pool = db::connect_pool(&args.conn, config)?;
            let client = pool.get().await.context("failed to get a database connection")?;
            jobs::remove(&client, &actor, &args.id).await
        }
    };

    print_response(&response)
}

/// Flags win over `[actor]`; `--admin` only ever adds rights.
fn resolve_actor(args: &ActorArgs, config: Option<&ProjectConfig>) -> Actor {
    let configured = config.map(|c| &c.file.actor);
    Actor {
        username: args
            .user
            .clone()
            .or_else(|| configured.and_then(|a| a.username.clone())),
        is_admin: args.admin || configured.is_some_and(|a| a.is_admin),
    }
}

/// Parse a JSON body given inline, or from stdin when it is `-`.
fn read_body(raw: &str) -> anyhow::Result<Value> {
    let text = if raw == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request body from stdin")?;
        buf
    } else {
        raw.to_string()
    };
    serde_json::from_str(&text).context("request body is not valid JSON")
}

fn print_response(response: &ApiResponse) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(&response.body)?;
    println!("{rendered}");
    if !response.is_success() {
        anyhow::bail!("request failed with status {}", response.status);
    }
    Ok(())
}
