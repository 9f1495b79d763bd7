use dayplan_core::notice::{Notice, NoticeSink, Severity};
use dayplan_core::notification::DueNotification;
use owo_colors::{OwoColorize, Style};

/// Prints notices as they arrive. Errors go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl NoticeSink for TerminalSink {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success => {
                let success_style = Style::new().green().bold();
                println!("{} {}", "✓".style(success_style), notice.title);
            }
            Severity::Info => {
                let info_style = Style::new().blue();
                println!("{} {}", "→".style(info_style), notice.title);
            }
            Severity::Error => {
                let error_style = Style::new().red().bold();
                eprintln!("{} {}", "Error:".style(error_style), notice.title);
            }
        }
    }
}

pub fn print_reminder(due: &DueNotification) {
    let subtle_style = Style::new().bright_black();
    println!(
        "{} {} {}",
        "🔔".yellow(),
        due.message.bright_white().bold(),
        format!("({})", due.starts_at.format("%Y-%m-%d %H:%M")).style(subtle_style)
    );
}
