use std::io::Write;
use std::path::PathBuf;

use log::LevelFilter;

use crate::action_executor::SystemExecutor;
use crate::catalog::DesktopEntryCatalog;
use crate::config::{self, ConfigError};
use crate::contract::{
    AppDto, AppListResponse, CompletionResponse, LaunchResponse, SearchResponse, SearchResultDto,
};
use crate::launcher::{LauncherService, ServiceError};
use crate::model::ApplicationEntry;
use crate::usage::{JsonFileStore, UsageTracker};

const USAGE: &str = "usage: quicklaunch [--config PATH] [--json] [--verbose] \
<search QUERY | complete QUERY | launch QUERY | recent | frequent [N]>";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("logging unavailable: {0}")]
    Logging(#[source] std::io::Error),
    #[error("output failed: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Search(String),
    Complete(String),
    Launch(String),
    Recent,
    Frequent(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
    pub command: CliCommand,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut config_path = None;
    let mut json = false;
    let mut verbose = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag '{flag}'\n{USAGE}"));
            }
            other => positional.push(other),
        }
    }

    let Some((&name, rest)) = positional.split_first() else {
        return Err(USAGE.to_string());
    };
    let query = rest.join(" ");

    let command = match name {
        "search" => CliCommand::Search(require_query(name, query)?),
        "complete" => CliCommand::Complete(require_query(name, query)?),
        "launch" => CliCommand::Launch(require_query(name, query)?),
        "recent" => CliCommand::Recent,
        "frequent" => {
            let count = match rest.first() {
                Some(raw) => raw
                    .parse::<usize>()
                    .map_err(|_| format!("frequent expects a count, got '{raw}'"))?,
                None => 5,
            };
            CliCommand::Frequent(count)
        }
        other => return Err(format!("unknown command '{other}'\n{USAGE}")),
    };

    Ok(CliOptions {
        config_path,
        json,
        verbose,
        command,
    })
}

fn require_query(command: &str, query: String) -> Result<String, String> {
    if query.trim().is_empty() {
        Err(format!("{command} requires a query"))
    } else {
        Ok(query)
    }
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    crate::logging::init(&config.log_dir, level).map_err(RuntimeError::Logging)?;
    log::info!(
        "startup config_path={} usage_path={}",
        config.config_path.display(),
        config.usage_path.display()
    );

    let source = DesktopEntryCatalog::from_config_dirs(&config.application_dirs);
    let store = JsonFileStore::new(config.usage_path.clone());
    let mut service =
        LauncherService::init(config, &source, Box::new(store), Box::new(SystemExecutor))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = execute(&mut service, &options.command, options.json, &mut out);
    service.dispose();
    outcome
}

/// Runs one CLI command against `service`, writing plain text or JSON.
pub fn execute(
    service: &mut LauncherService,
    command: &CliCommand,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), RuntimeError> {
    match command {
        CliCommand::Search(query) => {
            let results: Vec<SearchResultDto> =
                service.search(query).into_iter().map(Into::into).collect();
            let preview = service.preview_for(query).map(|preview| preview.text);
            if json {
                let response = SearchResponse {
                    query: query.clone(),
                    results,
                    preview,
                };
                writeln!(out, "{}", serde_json::to_string(&response)?)?;
            } else {
                if results.is_empty() {
                    writeln!(out, "No matches for '{query}'.")?;
                }
                for result in results {
                    writeln!(out, "{:>5}  {}", result.score, result.title)?;
                }
            }
        }
        CliCommand::Complete(query) => {
            let completion = service.complete(query);
            if json {
                let response = CompletionResponse {
                    query: query.clone(),
                    completion,
                };
                writeln!(out, "{}", serde_json::to_string(&response)?)?;
            } else if let Some(rest) = completion {
                writeln!(out, "{query}{rest}")?;
            }
        }
        CliCommand::Launch(query) => {
            service.set_text(query);
            let launched = service.activate_selected()?;
            if json {
                let response = LaunchResponse {
                    launched: launched.map(Into::into),
                };
                writeln!(out, "{}", serde_json::to_string(&response)?)?;
            } else {
                match launched {
                    Some(result) => writeln!(out, "Launched {}", result.title)?,
                    None => writeln!(out, "Nothing to launch for '{query}'.")?,
                }
            }
        }
        CliCommand::Recent => {
            let apps = app_list(service.usage(), service.recent_apps());
            write_apps(out, apps, json)?;
        }
        CliCommand::Frequent(count) => {
            let apps = app_list(service.usage(), service.frequent_apps(*count));
            write_apps(out, apps, json)?;
        }
    }
    Ok(())
}

fn app_list(usage: &UsageTracker, entries: Vec<&ApplicationEntry>) -> Vec<AppDto> {
    entries
        .into_iter()
        .map(|entry| AppDto::from_entry(entry, usage))
        .collect()
}

fn write_apps(out: &mut dyn Write, apps: Vec<AppDto>, json: bool) -> Result<(), RuntimeError> {
    if json {
        writeln!(out, "{}", serde_json::to_string(&AppListResponse { apps })?)?;
        return Ok(());
    }
    for app in apps {
        writeln!(out, "{:>4}x  {}", app.launch_count, app.name)?;
    }
    Ok(())
}
