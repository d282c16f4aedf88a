mod report;
mod session;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use aivis_analytics::{
    run_benchmark, run_domain_detail, run_execution_lookup, BenchmarkRequest, DateWindow,
    DomainDetailRequest, ExecutionLookupRequest, SourceTarget,
};
use aivis_core::Environment;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[derive(Debug, Parser)]
#[command(name = "aivis-cli")]
#[command(about = "Competitive AI-visibility analytics over exported execution records")]
struct Cli {
    /// JSON export of execution records (overrides AIVIS_RECORDS_PATH)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Tracking YAML naming the business and competitors (overrides AIVIS_TRACKING_PATH)
    #[arg(long, global = true)]
    tracking: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Full competitive benchmark: scorecard, positioning, query outcomes and source gaps
    Benchmark {
        /// Look-back window in days (defaults to AIVIS_DEFAULT_DAYS)
        #[arg(long, conflicts_with_all = ["start", "end"])]
        days: Option<u32>,

        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Restrict to one platform id
        #[arg(long)]
        platform: Option<i64>,

        /// Print the full response as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Drill into how one cited domain is used
    Domain {
        domain: String,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        /// Restrict to these platform ids (repeatable)
        #[arg(long = "platform")]
        platforms: Vec<i64>,

        #[arg(long)]
        json: bool,
    },
    /// List executions that cited a URL or domain
    Lookup {
        #[arg(long, conflicts_with = "domain", required_unless_present = "domain")]
        url: Option<String>,

        #[arg(long)]
        domain: Option<String>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },
    /// Print the page type of each URL
    Classify {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("aivis-cli: no command given; run with --help to list commands");
        return Ok(());
    };

    let paths = (cli.records.as_deref(), cli.tracking.as_deref());
    let now = Utc::now();

    match command {
        Commands::Classify { urls } => {
            init_tracing("info", true)?;
            report::print_classifications(&urls);
        }
        Commands::Benchmark {
            days,
            start,
            end,
            platform,
            json,
        } => {
            let session = open_session(paths).await?;
            let window = match days {
                Some(days) => DateWindow::LastDays(days),
                None => DateWindow::from_bounds(start, end, session.ctx.default_days, now)?,
            };
            let request = BenchmarkRequest {
                business_id: session.ctx.business.id,
                window,
                platform_id: platform,
            };
            let response = run_benchmark(
                &session.store,
                &session.ctx,
                &session.tracking,
                &request,
                now,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                report::print_benchmark(&response);
            }
        }
        Commands::Domain {
            domain,
            start,
            end,
            platforms,
            json,
        } => {
            let session = open_session(paths).await?;
            let request = DomainDetailRequest {
                business_id: session.ctx.business.id,
                domain,
                start_date: start,
                end_date: end,
                platform_ids: (!platforms.is_empty()).then_some(platforms),
            };
            let response = run_domain_detail(&session.store, &session.ctx, &request, now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                report::print_domain_detail(&response);
            }
        }
        Commands::Lookup {
            url,
            domain,
            start,
            end,
            json,
        } => {
            let target = match (url, domain) {
                (Some(url), _) => SourceTarget::Url(url),
                (None, Some(domain)) => SourceTarget::Domain(domain),
                (None, None) => anyhow::bail!("lookup needs --url or --domain"),
            };
            let session = open_session(paths).await?;
            let request = ExecutionLookupRequest {
                business_id: session.ctx.business.id,
                target,
                start_date: start,
                end_date: end,
            };
            let response = run_execution_lookup(&session.store, &session.ctx, &request, now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                report::print_execution_lookup(&request.target, &response);
            }
        }
    }

    Ok(())
}

/// Resolve config, start logging and load the tracking file and export.
async fn open_session(paths: (Option<&Path>, Option<&Path>)) -> anyhow::Result<Session> {
    let config = load_config(paths.0, paths.1)?;
    init_tracing(&config.log_level, use_ansi(&config.env))?;
    Session::load(&config).await
}

/// Environment configuration with `--records` / `--tracking` layered on top.
fn load_config(
    records: Option<&Path>,
    tracking: Option<&Path>,
) -> anyhow::Result<aivis_core::AppConfig> {
    let mut overrides: HashMap<&str, String> = HashMap::new();
    if let Some(path) = records {
        overrides.insert("AIVIS_RECORDS_PATH", path.display().to_string());
    }
    if let Some(path) = tracking {
        overrides.insert("AIVIS_TRACKING_PATH", path.display().to_string());
    }
    Ok(aivis_core::load_app_config(&overrides)?)
}

/// Production logs are plain lines for collectors; elsewhere they are coloured.
fn use_ansi(env: &Environment) -> bool {
    !matches!(env, Environment::Production)
}

fn init_tracing(fallback_level: &str, ansi: bool) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(ansi)
        .init();
    Ok(())
}
