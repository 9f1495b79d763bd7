use clap::{Parser, Subcommand};
use dayplan_core::models::RepeatType;

/// A calendar with recurring events and reminders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new event
    Add(AddCommand),
    /// List events
    List(ListCommand),
    /// Edit an event
    Edit(EditCommand),
    /// Delete an event
    Delete(DeleteCommand),
    /// Preview the dates a recurrence rule produces
    Expand(ExpandCommand),
    /// Stay running and print reminders as events come due
    Watch(WatchCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the event
    pub title: String,
    /// The date of the event (e.g. '2024-10-15', 'tomorrow')
    #[clap(long)]
    pub date: String,
    /// Start time (HH:MM)
    #[clap(short, long)]
    pub start: String,
    /// End time (HH:MM)
    #[clap(short, long)]
    pub end: String,
    /// The description of the event
    #[clap(short, long)]
    pub description: Option<String>,
    /// Where the event takes place
    #[clap(short, long)]
    pub location: Option<String>,
    /// The category of the event (work, personal, family, other)
    #[clap(short, long)]
    pub category: Option<String>,
    /// Minutes before the start to show a reminder
    #[clap(long, default_value_t = 10)]
    pub notify: u32,
    /// How the event repeats (none, daily, weekly, monthly, yearly)
    #[clap(long)]
    pub repeat: Option<RepeatType>,
    /// Repeat every N days/weeks/months/years
    #[clap(long, default_value_t = 1)]
    pub interval: u32,
    /// Last date the event may repeat on
    #[clap(long)]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only show events in this month (YYYY-MM)
    #[clap(long, conflicts_with = "date")]
    pub month: Option<String>,
    /// Only show events on this date
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or a unique prefix) of the event to edit
    pub id: String,
    /// The new title
    #[clap(short, long)]
    pub title: Option<String>,
    /// The new date
    #[clap(long)]
    pub date: Option<String>,
    /// The new start time (HH:MM)
    #[clap(short, long)]
    pub start: Option<String>,
    /// The new end time (HH:MM)
    #[clap(short, long)]
    pub end: Option<String>,
    /// The new description
    #[clap(short, long)]
    pub description: Option<String>,
    /// The new location
    #[clap(short, long)]
    pub location: Option<String>,
    /// The new category
    #[clap(short, long)]
    pub category: Option<String>,
    /// Minutes before the start to show a reminder
    #[clap(long)]
    pub notify: Option<u32>,
    /// Turn a single event into a repeating one
    #[clap(long)]
    pub repeat: Option<RepeatType>,
    /// Repeat every N days/weeks/months/years
    #[clap(long, requires = "repeat")]
    pub interval: Option<u32>,
    /// Last date the event may repeat on
    #[clap(long, requires = "repeat")]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or a unique prefix) of the event to delete
    pub id: String,
    /// Delete without asking for confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ExpandCommand {
    /// The first occurrence
    #[clap(long)]
    pub date: String,
    /// How the event repeats
    #[clap(long)]
    pub repeat: RepeatType,
    /// Repeat every N days/weeks/months/years
    #[clap(long, default_value_t = 1)]
    pub interval: u32,
    /// Last date the event may repeat on
    #[clap(long)]
    pub until: Option<String>,
    /// Show at most this many dates
    #[clap(long, default_value_t = 20)]
    pub count: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct WatchCommand {
    /// How often to check for due reminders, in milliseconds
    #[clap(long)]
    pub poll_ms: Option<u64>,
    /// How often to reload events from the server, in seconds
    #[clap(long, default_value_t = 60)]
    pub refresh_secs: u64,
}
