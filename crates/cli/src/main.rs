mod cli;
mod input;
mod terminal;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ruleport_core::Config;
use ruleport_rules::schema::{Category, CategoryCatalog};
use ruleport_rules::submit::HttpRuleSink;
use ruleport_rules::{ImportError, ImportPipeline, ImportRequest};

use crate::cli::{CliArgs, Command, ImportArgs, InspectArgs};
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    ruleport_core::load_dotenv();
    let args = CliArgs::parse();
    let config = Config::from_env();
    config.log_summary();

    let terminal = Terminal::new();
    match args.command {
        Command::Inspect(args) => inspect(&config, &terminal, args),
        Command::Import(args) => import(config, &terminal, args).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_pipeline(config: &Config) -> Result<ImportPipeline<HttpRuleSink>> {
    let sink = HttpRuleSink::from_config(&config.remote).context("failed to create rule sink")?;
    let catalog = CategoryCatalog::from_alert_categories(&config.import.alert_categories);
    Ok(ImportPipeline::new(sink, catalog))
}

fn inspect(config: &Config, terminal: &Terminal, args: InspectArgs) -> Result<ExitCode> {
    let raw = input::read_payload(&args.file)?;
    let pipeline = build_pipeline(config)?;
    let preview = pipeline.preview(&raw)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        terminal.print_preview(&preview)?;
    }

    if preview.allow_submit && preview.validation.valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn import(mut config: Config, terminal: &Terminal, args: ImportArgs) -> Result<ExitCode> {
    if let Some(server) = &args.server {
        config.remote.base_url = server.clone();
    }
    let raw = input::read_payload(&args.file)?;
    let pipeline = build_pipeline(&config)?;

    let mut overrides = match &args.overrides {
        Some(arg) => input::parse_overrides(arg)?,
        None => Vec::new(),
    };
    if args.keep_values {
        let preview = pipeline.preview(&raw)?;
        overrides = input::with_initial_values(&preview.fields, overrides);
    }

    let request = ImportRequest {
        payload: raw,
        group_id: args.group,
        category: args.category.as_deref().map(Category::new),
        enabled: args.enabled.unwrap_or(config.import.default_enabled),
        overrides,
        datasource_queries: args
            .datasource_queries
            .as_deref()
            .map(input::parse_json_arg)
            .transpose()?,
    };

    let prepared = match pipeline.prepare(&request) {
        Ok(prepared) => prepared,
        Err(e) => {
            terminal.print_error(&e)?;
            if let ImportError::InvalidBatch { errors } = &e {
                for error in errors {
                    terminal.print_error(format!("{}: {}", error.path, error.message))?;
                }
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    if !args.json {
        terminal.print_prepared(&prepared)?;
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling import");
            on_signal.cancel();
        }
    });

    let report = match pipeline.submit(&prepared, &cancel).await {
        Ok(report) => report,
        Err(e) => {
            terminal.print_error(&e)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "import finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        terminal.print_report(&report)?;
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
