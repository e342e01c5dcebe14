use clap::Parser;
use tracing_subscriber::EnvFilter;

use sql_gateway::http::{ServerConfig, run_server};
use sql_gateway::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        tracing::error!(error = %err, "sql-gateway stopped");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_args(args)?;
    tracing::info!(
        bind = %config.bind,
        db_type = ?config.backend.db_type(),
        pool_size = config.pool.max_size,
        statement_timeout_ms = u64::try_from(config.executor.statement_timeout.as_millis()).unwrap_or(u64::MAX),
        read_retries = config.executor.read_retries,
        init_schema = config.init_schema,
        "starting"
    );

    let cap = config.connect().await?;
    let gateway = Gateway::new(cap, config.executor);

    run_server(
        gateway,
        ServerConfig {
            bind_addr: config.bind,
            cors_origins: config.cors_origins,
            verbose_errors: config.verbose_errors,
        },
    )
    .await?;
    Ok(())
}
