use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Init,
    Migrate,
    Jobs,
    JobsList,
    JobsGet,
    JobsCreate,
    JobsUpdate,
    JobsDelete,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Init(InitArgs),
    Migrate(MigrateArgs),
    Jobs(JobsCommand),
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

/// Options shared by every command that talks to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnArgs {
    pub config: PathBuf,
    pub database: Option<String>,
}

impl Default for ConnArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("jobly.toml"),
            database: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MigrateArgs {
    pub conn: ConnArgs,
    pub to: Option<i32>,
    pub dry_run: bool,
}

/// Who the request runs as; overrides `[actor]` from the config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorArgs {
    pub user: Option<String>,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub enum JobsCommand {
    List(JobsListArgs),
    Get(JobsGetArgs),
    Create(JobsCreateArgs),
    Update(JobsUpdateArgs),
    Delete(JobsDeleteArgs),
}

#[derive(Debug, Clone)]
pub struct JobsListArgs {
    pub conn: ConnArgs,
    /// Raw query-string pairs, in the order given.
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct JobsGetArgs {
    pub conn: ConnArgs,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct JobsCreateArgs {
    pub conn: ConnArgs,
    pub actor: ActorArgs,
    /// JSON body, or `-` to read it from stdin.
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct JobsUpdateArgs {
    pub conn: ConnArgs,
    pub actor: ActorArgs,
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct JobsDeleteArgs {
    pub conn: ConnArgs,
    pub actor: ActorArgs,
    pub id: String,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "init" => parse_init(it.map(|s| s.as_str())),
        "migrate" => parse_migrate(it.map(|s| s.as_str())),
        "jobs" => parse_jobs(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Take the value of `--flag <v>` or `--flag=<v>`.
///
/// Returns `Ok(None)` when `token` is not `flag`.
fn flag_value<'a>(
    token: &'a str,
    flag: &str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    match token.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
        Some(v) => Ok(Some(v)),
        None => Ok(None),
    }
}

/// Consume `--config` / `--database` if `token` is one of them.
fn parse_conn_flag<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    conn: &mut ConnArgs,
) -> anyhow::Result<bool> {
    if let Some(v) = flag_value(token, "--config", it)? {
        conn.config = PathBuf::from(v);
        return Ok(true);
    }
    if let Some(v) = flag_value(token, "--database", it)? {
        conn.database = Some(v.to_string());
        return Ok(true);
    }
    Ok(false)
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("jobly.toml");

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Init));
        }
        if let Some(v) = flag_value(token, "--config", &mut it)? {
            config = PathBuf::from(v);
            continue;
        }
        anyhow::bail!("unknown argument: {token}");
    }

    Ok(Command::Init(InitArgs { config }))
}

fn parse_migrate<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut conn = ConnArgs::default();
    let mut to: Option<i32> = None;
    let mut dry_run = false;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Migrate));
        }
        if parse_conn_flag(token, &mut it, &mut conn)? {
            continue;
        }
        if let Some(v) = flag_value(token, "--to", &mut it)? {
            let version = v
                .parse::<i32>()
                .map_err(|_| anyhow::anyhow!("--to must be a migration version, got {v}"))?;
            to = Some(version);
            continue;
        }
        match token {
            "--dry-run" => dry_run = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Migrate(MigrateArgs { conn, to, dry_run }))
}

fn parse_jobs<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut conn = ConnArgs::default();
    let mut actor = ActorArgs::default();
    let mut query: Vec<(String, String)> = Vec::new();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => {
                return Ok(Command::Help(match subcmd {
                    None => HelpTopic::Jobs,
                    Some("list") => HelpTopic::JobsList,
                    Some("get") => HelpTopic::JobsGet,
                    Some("create") => HelpTopic::JobsCreate,
                    Some("update") => HelpTopic::JobsUpdate,
                    Some("delete") => HelpTopic::JobsDelete,
                    Some(other) => anyhow::bail!("unknown subcommand: {other}"),
                }));
            }
            "list" | "get" | "create" | "update" | "delete" if subcmd.is_none() => {
                subcmd = Some(token);
            }
            "--has-equity" => query.push(("hasEquity".to_string(), "true".to_string())),
            "--admin" => actor.admin = true,
            _ if parse_conn_flag(token, &mut it, &mut conn)? => {}
            _ => {
                if let Some(v) = flag_value(token, "--user", &mut it)? {
                    actor.user = Some(v.to_string());
                } else if let Some(v) = flag_value(token, "--min-salary", &mut it)? {
                    query.push(("minSalary".to_string(), v.to_string()));
                } else if let Some(v) = flag_value(token, "--title", &mut it)? {
                    query.push(("title".to_string(), v.to_string()));
                } else if token.starts_with("--") {
                    anyhow::bail!("unknown argument: {token}");
                } else {
                    positional.push(token);
                }
            }
        }
    }

    let Some(subcmd) = subcmd else {
        return Ok(Command::Help(HelpTopic::Jobs));
    };

    let filters_given = !query.is_empty();
    let actor_given = actor != ActorArgs::default();

    let cmd = match (subcmd, positional.as_slice()) {
        ("list", []) => {
            if actor_given {
                anyhow::bail!("invalid options for `jobs list`");
            }
            JobsCommand::List(JobsListArgs { conn, query })
        }
        ("get", [id]) => {
            if filters_given || actor_given {
                anyhow::bail!("invalid options for `jobs get`");
            }
            JobsCommand::Get(JobsGetArgs {
                conn,
                id: id.to_string(),
            })
        }
        ("create", [body]) => {
            if filters_given {
                anyhow::bail!("invalid options for `jobs create`");
            }
            JobsCommand::Create(JobsCreateArgs {
                conn,
                actor,
                body: body.to_string(),
            })
        }
        ("update", [id, body]) => {
            if filters_given {
                anyhow::bail!("invalid options for `jobs update`");
            }
            JobsCommand::Update(JobsUpdateArgs {
                conn,
                actor,
                id: id.to_string(),
                body: body.to_string(),
            })
        }
        ("delete", [id]) => {
            if filters_given {
                anyhow::bail!("invalid options for `jobs delete`");
            }
            JobsCommand::Delete(JobsDeleteArgs {
                conn,
                actor,
                id: id.to_string(),
            })
        }
        (sub, args) => anyhow::bail!(
            "wrong number of arguments for `jobs {sub}` (got {}); see `jobly jobs {sub} --help`",
            args.len()
        ),
    };

    Ok(Command::Jobs(cmd))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - jobs resource of the job board

USAGE:
  jobly <COMMAND> [OPTIONS]

COMMANDS:
  init          Write a starter jobly.toml
  migrate       Apply the embedded schema migrations
  jobs          List, read, create, update and delete jobs

Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  jobly init [OPTIONS]

OPTIONS:
  --config <FILE>       Output config path (default: jobly.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Migrate => {
            println!(
                "\
USAGE:
  jobly migrate [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  --to <VERSION>        Apply up to target version (inclusive)
  --dry-run             Print the embedded migrations without connecting
  -h, --help            Print help"
            );
        }
        HelpTopic::Jobs => {
            println!(
                "\
USAGE:
  jobly jobs list [OPTIONS]
  jobly jobs get <ID> [OPTIONS]
  jobly jobs create <JSON> [OPTIONS]
  jobly jobs update <ID> <JSON> [OPTIONS]
  jobly jobs delete <ID> [OPTIONS]

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help

ACTOR OPTIONS (create/update/delete):
  --user <NAME>         Act as this user (overrides actor.username)
  --admin               Act with admin rights

Responses are printed as JSON. Pass `-` as <JSON> to read the body from stdin."
            );
        }
        HelpTopic::JobsList => {
            println!(
                "\
USAGE:
  jobly jobs list [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  --min-salary <N>      Only jobs paying more than N
  --has-equity          Only jobs with non-zero equity
  --title <TEXT>        Case-insensitive title substring
  -h, --help            Print help"
            );
        }
        HelpTopic::JobsGet => {
            println!(
                "\
USAGE:
  jobly jobs get <ID> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
        HelpTopic::JobsCreate => {
            println!(
                "\
USAGE:
  jobly jobs create <JSON> [OPTIONS]

EXAMPLE:
  jobly jobs create '{{\"title\":\"Welder\",\"salary\":50000,\"companyHandle\":\"acme\"}}' --admin --user root

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  --user <NAME>         Act as this user
  --admin               Act with admin rights
  -h, --help            Print help"
            );
        }
        HelpTopic::JobsUpdate => {
            println!(
                "\
USAGE:
  jobly jobs update <ID> <JSON> [OPTIONS]

NOTES:
  Only title, salary and equity can change.

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  --user <NAME>         Act as this user
  --admin               Act with admin rights
  -h, --help            Print help"
            );
        }
        HelpTopic::JobsDelete => {
            println!(
                "\
USAGE:
  jobly jobs delete <ID> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  --user <NAME>         Act as this user
  --admin               Act with admin rights
  -h, --help            Print help"
            );
        }
    }
}
