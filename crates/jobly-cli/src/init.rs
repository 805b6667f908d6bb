use crate::cli::InitArgs;
use anyhow::Context;
use std::path::Path;

const TEMPLATE: &str = r#"version = "1"

[database]
url = "${DATABASE_URL}"
pool_size = 4

# Identity used by `jobly jobs create|update|delete`.
# `--user` and `--admin` override these per invocation.
[actor]
# username = "admin"
is_admin = false

[log]
# Any tracing EnvFilter directive; RUST_LOG takes precedence.
level = "warn"
"#;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(path, TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    #[test]
    fn template_is_a_valid_config() {
        let raw = TEMPLATE.replace("${DATABASE_URL}", "postgres://localhost/jobly");
        let file = ConfigFile::parse(&raw).unwrap();
        assert_eq!(file.database.pool_size, 4);
        assert!(!file.actor.is_admin);
        assert_eq!(file.log.level.as_deref(), Some("warn"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let path = std::env::temp_dir().join(format!("jobly-init-{}.toml", std::process::id()));
        std::fs::write(&path, "existing").unwrap();
        let err = write_template(&path).unwrap_err();
        assert!(err.to_string().starts_with("refusing to overwrite"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
        std::fs::remove_file(&path).unwrap();
    }
}
