//! poolbench: connection pool insertion benchmark
//!
//! # Usage
//!
//! ```bash
//! # Run all four strategies with settings from .env / the environment
//! poolbench
//!
//! # 5000 rows per strategy, JSON report
//! poolbench --rows 5000 --format json
//!
//! # Only compare the per-row pool exec against one transaction
//! poolbench --strategy pool-exec,transaction
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::*;
use poolbench::prelude::*;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poolbench")]
#[command(version)]
#[command(about = "Compare four ways of inserting rows through a connection pool", long_about = None)]
#[command(after_help = "ENVIRONMENT:
    DB_HOST, DB_USER, DB_PASS, DB_NAME, DB_POOL_SIZE, BENCHMARK_INSERT_COUNT,
    BENCHMARK_TABLE, DB_PING_TIMEOUT_SECS")]
struct Cli {
    /// Settings file loaded before reading the environment (default: .env)
    #[arg(long, env = "BENCHMARK_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Rows inserted by each strategy
    #[arg(short, long)]
    rows: Option<u64>,

    /// Maximum open connections
    #[arg(short, long)]
    pool_size: Option<u32>,

    /// Target table with name and email columns
    #[arg(short, long)]
    table: Option<String>,

    /// Strategies to run (always executed in the fixed order)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    strategy: Vec<StrategyKind>,

    /// Output format for the final report
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        error!("Benchmark failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "poolbench=debug"
    } else {
        "poolbench=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    load_env_file(cli.env_file.as_deref());

    let mut config = Config::from_env();
    if let Some(rows) = cli.rows {
        config = config.with_insert_count(rows);
    }
    if let Some(size) = cli.pool_size {
        config = config.with_pool_size(size);
    }
    if let Some(table) = &cli.table {
        config = config.with_table(table.as_str());
    }

    let target = open_pool(&config)
        .await
        .context("Failed to create connection pool")?;

    let runner = if cli.strategy.is_empty() {
        Runner::standard()
    } else {
        Runner::from_kinds(&cli.strategy)
    };

    let report = runner
        .run(&target, config.insert_count, config.pool_size)
        .await;
    target.close().await;
    let report = report.context("Benchmark aborted")?;

    match cli.format {
        OutputFormat::Table => println!("{}", report.to_table()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
