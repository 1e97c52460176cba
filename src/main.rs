mod api;
mod config;
mod error;
mod jobs;
mod network;
mod scheduler;
mod transform;

use crate::{
    api::Api,
    config::{Config, RawConfig},
    network::Network,
    scheduler::{Scheduler, SchedulerTrigger},
    transform::RecordTransform,
};
use anyhow::{Context, anyhow};
use clap::{Arg, ArgMatches, Command, crate_authors, crate_description, crate_version};
use std::{env, sync::Arc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    if env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().flatten_event(true).init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let matches = Command::new("Job trigger")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg(
            Arg::new("CONFIG")
                .env("JOBTRIGGER_CONFIG")
                .short('c')
                .long("config")
                .global(true)
                .default_value("jobtrigger.toml")
                .help("Path to the application configuration file."),
        )
        .subcommand(
            Command::new("run")
                .about("Registers all configured triggers and fires them on their intervals."),
        )
        .subcommand(
            Command::new("submit")
                .about("Submits the job of the configured trigger once.")
                .arg(
                    Arg::new("TRIGGER")
                        .required(true)
                        .help("Name of the configured trigger."),
                ),
        )
        .subcommand(Command::new("triggers").about("Lists configured triggers."))
        .subcommand(
            Command::new("transform")
                .about("Transforms delimited text lines into JSON records.")
                .arg(
                    Arg::new("PROPERTIES")
                        .short('p')
                        .long("properties")
                        .required(true)
                        .value_delimiter(',')
                        .help("Comma separated property names, one per column."),
                )
                .arg(
                    Arg::new("DELIMITER")
                        .short('d')
                        .long("delimiter")
                        .value_parser(clap::value_parser!(char))
                        .default_value(",")
                        .help("Column delimiter."),
                )
                .arg(Arg::new("FILE").help("Input file, standard input is used if omitted.")),
        )
        .get_matches();

    // Transform doesn't need any configuration.
    if let Some(("transform", matches)) = matches.subcommand() {
        return transform(matches).await;
    }

    let raw_config = RawConfig::read_from_file(
        matches
            .get_one::<String>("CONFIG")
            .ok_or_else(|| anyhow!("<CONFIG> argument is not provided."))?,
    )?;

    info!(
        "Execution service: {}, triggers: {}.",
        raw_config.execution.host,
        raw_config.triggers.len()
    );

    let config = Config::from(raw_config);
    let network = Network::create(&config.http.client)?;
    let api = Arc::new(Api::new(config, network));
    match matches.subcommand() {
        Some(("run", _)) => run(api).await,
        Some(("submit", matches)) => {
            submit(
                api,
                matches
                    .get_one::<String>("TRIGGER")
                    .ok_or_else(|| anyhow!("<TRIGGER> argument is not provided."))?,
            )
            .await
        }
        Some(("triggers", _)) => list_triggers(&api.config),
        _ => Err(anyhow!("Unknown command.")),
    }
}

/// Registers all configured triggers and runs the scheduler until Ctrl+C is received.
async fn run(api: Arc<Api>) -> anyhow::Result<()> {
    let mut scheduler = Scheduler::new(api.clone()).await?;
    for trigger_config in &api.config.triggers {
        scheduler
            .register(SchedulerTrigger::from(trigger_config))
            .await
            .with_context(|| format!("Cannot register trigger ({}).", trigger_config.name))?;
    }

    scheduler.start().await?;
    info!(
        "Scheduler has started with {} triggers.",
        scheduler.triggers().count()
    );

    tokio::signal::ctrl_c().await?;

    info!("Shutting down the scheduler.");
    scheduler.shutdown().await
}

/// Submits the job of the trigger with the specified name and prints the job handle.
async fn submit(api: Arc<Api>, trigger_name: &str) -> anyhow::Result<()> {
    let trigger = api
        .config
        .trigger(trigger_name)
        .map(SchedulerTrigger::from)
        .ok_or_else(|| anyhow!("Trigger ({trigger_name}) is not configured."))?;

    match api
        .jobs()
        .submit_with_retry(trigger.descriptor(), trigger.retry_strategy())
        .await
    {
        Ok(handle) => {
            println!("{}", serde_json::to_string_pretty(&handle)?);
            Ok(())
        }
        Err(err) => {
            error!(
                trigger.name = trigger_name,
                error.kind = %err.kind(),
                "Failed to submit job: {err}"
            );
            Err(err.into())
        }
    }
}

/// Prints configured triggers.
fn list_triggers(config: &Config) -> anyhow::Result<()> {
    for trigger in config.triggers.iter().map(SchedulerTrigger::from) {
        let descriptor = trigger.descriptor();
        let required_parameters = descriptor
            .required_parameters()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        println!(
            "{}\t{}\t{}\tevery {}\tsince {}\trequires [{}]",
            descriptor.name(),
            descriptor.template_path(),
            descriptor.location(),
            humantime::format_duration(descriptor.schedule_interval()),
            descriptor.start_time(),
            required_parameters.join(", ")
        );
    }

    Ok(())
}

/// Transforms lines of the input file (or standard input) into NDJSON records.
async fn transform(matches: &ArgMatches) -> anyhow::Result<()> {
    let properties = matches
        .get_many::<String>("PROPERTIES")
        .ok_or_else(|| anyhow!("<PROPERTIES> argument is not provided."))?;
    let delimiter = matches
        .get_one::<char>("DELIMITER")
        .copied()
        .unwrap_or(',');
    let record_transform = RecordTransform::new(properties.cloned()).with_delimiter(delimiter);

    match matches.get_one::<String>("FILE") {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Cannot open input file ({path})."))?;
            transform_lines(&record_transform, BufReader::new(file)).await
        }
        None => transform_lines(&record_transform, BufReader::new(tokio::io::stdin())).await,
    }
}

async fn transform_lines(
    record_transform: &RecordTransform,
    reader: impl AsyncBufRead + Unpin,
) -> anyhow::Result<()> {
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        println!("{}", record_transform.apply_to_string(&line)?);
    }

    Ok(())
}
