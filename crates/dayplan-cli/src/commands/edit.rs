use anyhow::{anyhow, Result};
use dayplan_core::models::{Event, RepeatInfo};
use dayplan_core::notice::NoticeSink;
use dayplan_core::store::EventStore;
use dayplan_core::sync::{EventSyncCoordinator, Outcome};
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::parser::{parse_date, parse_time};
use crate::util::resolve_event_id;

/// Applies the command's overrides to a copy of `event`.
pub fn apply_edit(event: &Event, command: EditCommand) -> Result<Event> {
    let mut edited = event.clone();

    if let Some(title) = command.title {
        edited.title = title;
    }
    if let Some(date) = command.date {
        edited.date = parse_date(&date)?;
    }
    if let Some(start) = command.start {
        edited.start_time = parse_time(&start)?;
    }
    if let Some(end) = command.end {
        edited.end_time = parse_time(&end)?;
    }
    if edited.end_time <= edited.start_time {
        anyhow::bail!(
            "End time {} must be after start time {}",
            edited.end_time.format("%H:%M"),
            edited.start_time.format("%H:%M")
        );
    }
    if let Some(description) = command.description {
        edited.description = description;
    }
    if let Some(location) = command.location {
        edited.location = location;
    }
    if let Some(category) = command.category {
        edited.category = category;
    }
    if let Some(minutes) = command.notify {
        edited.notification_offset_minutes = minutes;
    }
    if let Some(repeat_type) = command.repeat {
        edited.repeat = RepeatInfo {
            repeat_type,
            interval: command.interval.unwrap_or(event.repeat.interval.max(1)),
            end_date: match command.until {
                Some(until) => Some(parse_date(&until)?),
                None => event.repeat.end_date,
            },
        };
    }
    Ok(edited)
}

pub async fn edit_event<S: EventStore, N: NoticeSink>(
    coordinator: &EventSyncCoordinator<S, N>,
    command: EditCommand,
) -> Result<Outcome> {
    if !coordinator.fetch_all().await.is_success() {
        return Ok(Outcome::Failed);
    }

    let event_id = resolve_event_id(&coordinator.events(), &command.id)?;
    let event = coordinator
        .find(event_id)
        .ok_or_else(|| anyhow!("Event not found"))?;

    if event.repeat.is_repeating() {
        println!(
            "{}",
            "This event is part of a repeating series; the change applies to this occurrence only and detaches it from the series."
                .yellow()
        );
    }

    let edited = apply_edit(&event, command)?;
    Ok(coordinator.save(edited.into()).await?)
}
