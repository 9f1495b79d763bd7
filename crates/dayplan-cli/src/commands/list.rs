use anyhow::Result;
use chrono::Datelike;
use dayplan_core::models::Event;
use dayplan_core::notice::NoticeSink;
use dayplan_core::store::EventStore;
use dayplan_core::sync::{EventSyncCoordinator, Outcome};

use crate::cli::ListCommand;
use crate::parser::{parse_date, parse_month};
use crate::views::table::display_events;

pub async fn list_events<S: EventStore, N: NoticeSink>(
    coordinator: &EventSyncCoordinator<S, N>,
    command: ListCommand,
) -> Result<Outcome> {
    let month = command.month.as_deref().map(parse_month).transpose()?;
    let date = command.date.as_deref().map(parse_date).transpose()?;

    let outcome = coordinator.fetch_all().await;
    if !outcome.is_success() {
        return Ok(outcome);
    }

    let mut events: Vec<Event> = coordinator
        .events()
        .iter()
        .filter(|e| month.map_or(true, |(y, m)| e.date.year() == y && e.date.month() == m))
        .filter(|e| date.map_or(true, |d| e.date == d))
        .cloned()
        .collect();
    events.sort_by_key(|e| (e.date, e.start_time));

    display_events(&events);
    Ok(outcome)
}
