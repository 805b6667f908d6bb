use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter directive: `RUST_LOG`, then the config's `log.level`, then `warn`.
pub fn directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Install the global subscriber. Output goes to stderr so stdout stays JSON.
pub fn init(configured: Option<&str>) -> anyhow::Result<()> {
    let directive = directive(std::env::var("RUST_LOG").ok(), configured);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter {directive:?}: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
