use anyhow::Result;
use dayplan_core::models::{EventDraft, RepeatInfo, RepeatType};
use dayplan_core::notice::NoticeSink;
use dayplan_core::store::EventStore;
use dayplan_core::sync::{EventSyncCoordinator, Outcome};
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::parser::{parse_date, parse_time};
use crate::views::table::describe_repeat;

pub fn build_draft(command: AddCommand) -> Result<EventDraft> {
    let date = parse_date(&command.date)?;
    let start_time = parse_time(&command.start)?;
    let end_time = parse_time(&command.end)?;
    if end_time <= start_time {
        anyhow::bail!("End time {} must be after start time {}", command.end, command.start);
    }

    let repeat = match command.repeat.unwrap_or(RepeatType::None) {
        RepeatType::None => RepeatInfo::none(),
        repeat_type => RepeatInfo {
            repeat_type,
            interval: command.interval,
            end_date: command.until.as_deref().map(parse_date).transpose()?,
        },
    };

    let mut draft = EventDraft::new(command.title, date, start_time, end_time);
    draft.description = command.description.unwrap_or_default();
    draft.location = command.location.unwrap_or_default();
    draft.category = command.category.unwrap_or_default();
    draft.notification_offset_minutes = command.notify;
    draft.repeat = repeat;
    Ok(draft)
}

pub async fn add_event<S: EventStore, N: NoticeSink>(
    coordinator: &EventSyncCoordinator<S, N>,
    command: AddCommand,
) -> Result<Outcome> {
    let draft = build_draft(command)?;
    let title = draft.title.clone();
    let repeat = draft.repeat.clone();

    let outcome = coordinator.save(draft.into()).await?;

    if outcome.is_success() && repeat.is_repeating() {
        let info_style = Style::new().blue();
        let count = coordinator
            .events()
            .iter()
            .filter(|e| e.title == title && e.repeat == repeat)
            .count();
        println!(
            "  {} {} ({} occurrences)",
            "→".style(info_style),
            describe_repeat(&repeat),
            count.to_string().yellow()
        );
    }
    Ok(outcome)
}
