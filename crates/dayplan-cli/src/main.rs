use clap::Parser;
use dayplan_core::error::CoreError;
use dayplan_core::recurrence::RecurrenceExpander;
use dayplan_core::store::HttpEventStore;
use dayplan_core::sync::{EventSyncCoordinator, Outcome};
use owo_colors::{OwoColorize, Style};
use views::notice::TerminalSink;

mod cli;
mod commands;
mod config;
mod logging;
mod parser;
mod util;
mod views;

type Coordinator = EventSyncCoordinator<HttpEventStore, TerminalSink>;

#[tokio::main]
async fn main() {
    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Ignoring invalid configuration: {}", "Warning:".yellow().bold(), e);
            config::Config::default()
        }
    };
    logging::init(&config.log_level);

    let cli = cli::Cli::parse();

    let store = match HttpEventStore::new(&config.api_base_url, config.request_timeout()) {
        Ok(store) => store,
        Err(e) => {
            handle_error(e.into());
            std::process::exit(1);
        }
    };
    let coordinator: Coordinator = EventSyncCoordinator::new(
        store,
        TerminalSink,
        RecurrenceExpander::new(config.recurrence.clone()),
    );
    tracing::debug!(base_url = %coordinator.store().base_url(), "Using event API");

    let result = run(&coordinator, cli.command, &config).await;

    match result {
        Ok(Outcome::Succeeded) => {}
        Ok(Outcome::Failed) => std::process::exit(1),
        Err(e) => {
            handle_error(e);
            std::process::exit(1);
        }
    }
}

async fn run(
    coordinator: &Coordinator,
    command: cli::Commands,
    config: &config::Config,
) -> anyhow::Result<Outcome> {
    match command {
        cli::Commands::Add(command) => commands::add::add_event(coordinator, command).await,
        cli::Commands::List(command) => commands::list::list_events(coordinator, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_event(coordinator, command).await,
        cli::Commands::Delete(command) => {
            commands::delete::delete_event(coordinator, command).await
        }
        cli::Commands::Watch(command) => {
            commands::watch::watch_events(coordinator, command, config).await
        }
        cli::Commands::Expand(command) => {
            commands::expand::expand_rule(coordinator.expander(), command)?;
            Ok(Outcome::Succeeded)
        }
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        Some(CoreError::AmbiguousId(events)) => {
            eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
            eprintln!("Did you mean one of these?");
            for (id, title) in events {
                eprintln!("  {} ({})", id.yellow(), title);
            }
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::InvalidRecurrence(s)) => {
            eprintln!("{} Invalid recurrence: {}", "Error:".style(error_style), s);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
