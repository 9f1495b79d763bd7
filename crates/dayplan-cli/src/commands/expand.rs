use anyhow::Result;
use dayplan_core::models::RepeatInfo;
use dayplan_core::recurrence::RecurrenceExpander;

use crate::cli::ExpandCommand;
use crate::parser::parse_date;
use crate::views::table::display_occurrences;

/// Shows the dates a rule would produce without touching the store.
pub fn expand_rule(expander: &RecurrenceExpander, command: ExpandCommand) -> Result<()> {
    let anchor = parse_date(&command.date)?;
    let rule = RepeatInfo {
        repeat_type: command.repeat,
        interval: command.interval,
        end_date: command.until.as_deref().map(parse_date).transpose()?,
    };

    let occurrences = expander.occurrences(anchor, &rule)?;
    let total = occurrences.clone().count();
    let dates: Vec<_> = occurrences.take(command.count).collect();

    display_occurrences(&dates, total);
    Ok(())
}
