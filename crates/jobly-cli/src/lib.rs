mod cli;
mod config;
mod db;
mod init;
mod jobs_cmd;
mod logging;
mod migrate_cmd;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Init(args) => init::run(args),
        cli::Command::Migrate(args) => {
            let config = config::ProjectConfig::load_optional(&args.conn.config)?;
            start_logging(config.as_ref())?;
            migrate_cmd::run(args, config.as_ref()).await
        }
        cli::Command::Jobs(cmd) => {
            let config = config::ProjectConfig::load_optional(jobs_config_path(&cmd))?;
            start_logging(config.as_ref())?;
            jobs_cmd::run(cmd, config.as_ref()).await
        }
    }
}

fn start_logging(config: Option<&config::ProjectConfig>) -> anyhow::Result<()> {
    logging::init(config.and_then(|c| c.file.log.level.as_deref()))?;
    if let Some(c) = config {
        tracing::debug!(path = %c.config_path.display(), "loaded config");
    }
    Ok(())
}

fn jobs_config_path(cmd: &cli::JobsCommand) -> &std::path::Path {
    match cmd {
        cli::JobsCommand::List(a) => &a.conn.config,
        cli::JobsCommand::Get(a) => &a.conn.config,
        cli::JobsCommand::Create(a) => &a.conn.config,
        cli::JobsCommand::Update(a) => &a.conn.config,
        cli::JobsCommand::Delete(a) => &a.conn.config,
    }
}
