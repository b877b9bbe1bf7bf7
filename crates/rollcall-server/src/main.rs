use clap::Parser;
use rollcall_core::config::Config;
use rollcall_core::memory::MemoryStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "rollcall",
    about = "Attendance-marking server over a tabular store",
    version
)]
struct Cli {
    /// Config file (YAML); defaults apply when absent
    #[arg(long, env = "ROLLCALL_CONFIG")]
    config: Option<PathBuf>,

    /// Store snapshot file, created on first write
    #[arg(long, env = "ROLLCALL_DATA", default_value = "rollcall-store.json")]
    data: PathBuf,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Listen port
    #[arg(long, short = 'p', default_value_t = 3141)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let store = MemoryStore::open(&cli.data)?;
    // Both surfaces must exist before the first request; the grid template
    // itself (header dates, roster) is provisioned externally.
    store.add_sheet(&config.grid_sheet)?;
    store.add_sheet(&config.log_sheet)?;

    rollcall_server::serve(config, Arc::new(store), &cli.host, cli.port).await
}
