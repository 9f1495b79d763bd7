use chrono::{Datelike, Local, NaiveDate};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use dayplan_core::models::{Event, RepeatInfo, RepeatType};

pub fn display_events(events: &[Event]) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }

    let now = Local::now().naive_local();
    let today = now.date();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Time", "Title", "Location", "Category", "Repeat", "Starts"]);

    for event in events {
        let mut row = Row::new();
        row.add_cell(Cell::new(&event.id.to_string()[..8]));
        row.add_cell(Cell::new(format!("{} {}", event.date.format("%Y-%m-%d"), event.date.weekday())));
        row.add_cell(Cell::new(format!(
            "{}-{}",
            event.start_time.format("%H:%M"),
            event.end_time.format("%H:%M")
        )));

        let mut title = String::new();
        if event.repeat.is_repeating() {
            title.push('↻'); // Recurring symbol
            title.push(' ');
        }
        title.push_str(&event.title);

        let mut title_cell = Cell::new(title);
        if event.ends_at() < now {
            title_cell = title_cell.fg(Color::DarkGrey);
        } else if event.date == today {
            title_cell = title_cell.fg(Color::Yellow).add_attribute(Attribute::Bold);
        }
        row.add_cell(title_cell);

        row.add_cell(Cell::new(none_if_empty(&event.location)));
        row.add_cell(Cell::new(none_if_empty(&event.category)));
        row.add_cell(Cell::new(describe_repeat(&event.repeat)));
        row.add_cell(Cell::new((event.starts_at() - now).humanize()));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_occurrences(dates: &[NaiveDate], total: usize) {
    if dates.is_empty() {
        println!("The rule produces no dates.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Weekday"]);
    for (i, date) in dates.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(date.format("%Y-%m-%d")),
            Cell::new(date.weekday()),
        ]);
    }
    println!("{table}");

    if total > dates.len() {
        println!("Showing {} of {} occurrences.", dates.len(), total);
    }
}

pub fn describe_repeat(repeat: &RepeatInfo) -> String {
    let unit = match repeat.repeat_type {
        RepeatType::None => return "None".to_string(),
        RepeatType::Daily => "day",
        RepeatType::Weekly => "week",
        RepeatType::Monthly => "month",
        RepeatType::Yearly => "year",
    };
    let every = if repeat.interval == 1 {
        format!("Every {}", unit)
    } else {
        format!("Every {} {}s", repeat.interval, unit)
    };
    match repeat.end_date {
        Some(end) => format!("{} until {}", every, end),
        None => every,
    }
}

fn none_if_empty(value: &str) -> &str {
    if value.is_empty() {
        "None"
    } else {
        value
    }
}
