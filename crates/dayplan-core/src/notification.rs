use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeDelta};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::models::Event;

/// A reminder that just became due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueNotification {
    pub event_id: Uuid,
    pub title: String,
    pub starts_at: NaiveDateTime,
    pub minutes_until: i64,
    pub message: String,
}

impl DueNotification {
    fn for_event(event: &Event, now: NaiveDateTime) -> Self {
        let starts_at = event.starts_at();
        let seconds = (starts_at - now).num_seconds();
        let minutes_until = (seconds + 59) / 60;
        let unit = if minutes_until == 1 { "minute" } else { "minutes" };
        Self {
            event_id: event.id,
            title: event.title.clone(),
            starts_at,
            minutes_until,
            message: format!("{} starts in {} {}.", event.title, minutes_until, unit),
        }
    }
}

/// `now` lies in `[start - offset, start)`.
pub fn is_due(event: &Event, now: NaiveDateTime) -> bool {
    let start = event.starts_at();
    let window_start = start - TimeDelta::minutes(i64::from(event.notification_offset_minutes));
    window_start <= now && now < start
}

/// Decides which events need a reminder, firing each event id at most once.
///
/// The set of notified ids only grows for the lifetime of the matcher, so
/// calling [`NotificationMatcher::due`] repeatedly with `now` still inside an
/// alert window does not alert again.
#[derive(Debug, Default)]
pub struct NotificationMatcher {
    notified: HashSet<Uuid>,
    active: Vec<DueNotification>,
}

impl NotificationMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn due(&mut self, events: &[Event], now: NaiveDateTime) -> Vec<DueNotification> {
        let fresh: Vec<DueNotification> = events
            .iter()
            .filter(|event| is_due(event, now))
            .filter(|event| self.notified.insert(event.id))
            .map(|event| DueNotification::for_event(event, now))
            .collect();

        self.active.extend(fresh.iter().cloned());
        fresh
    }

    pub fn notified(&self) -> &HashSet<Uuid> {
        &self.notified
    }

    pub fn is_notified(&self, id: Uuid) -> bool {
        self.notified.contains(&id)
    }

    /// Reminders fired but not yet dismissed.
    pub fn active(&self) -> &[DueNotification] {
        &self.active
    }

    /// Hides a reminder; the event stays notified.
    pub fn dismiss(&mut self, id: Uuid) {
        self.active.retain(|n| n.event_id != id);
    }
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Runs a [`NotificationMatcher`] against the latest event snapshot on a timer.
pub struct NotificationPoller {
    matcher: NotificationMatcher,
    interval: Duration,
    clock: Clock,
}

impl NotificationPoller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(interval: Duration) -> Self {
        Self {
            matcher: NotificationMatcher::new(),
            interval,
            clock: Box::new(|| Local::now().naive_local()),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Polls until `out` is closed, then hands back the matcher.
    pub async fn run(
        mut self,
        events: watch::Receiver<Arc<Vec<Event>>>,
        out: mpsc::UnboundedSender<DueNotification>,
    ) -> NotificationMatcher {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !out.is_closed() {
            ticker.tick().await;
            let snapshot = events.borrow().clone();
            let now = (self.clock)();

            for due in self.matcher.due(&snapshot, now) {
                tracing::debug!(id = %due.event_id, "Reminder due");
                if out.send(due).is_err() {
                    return self.matcher;
                }
            }
        }
        self.matcher
    }
}

impl Default for NotificationPoller {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
