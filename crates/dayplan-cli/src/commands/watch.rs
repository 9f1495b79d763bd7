use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use dayplan_core::notice::NoticeSink;
use dayplan_core::notification::{DueNotification, NotificationPoller};
use dayplan_core::store::EventStore;
use dayplan_core::sync::{EventSyncCoordinator, Outcome};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::cli::WatchCommand;
use crate::config::Config;
use crate::views::notice::print_reminder;

/// Loads events, then prints reminders until Ctrl-C.
pub async fn watch_events<S: EventStore, N: NoticeSink>(
    coordinator: &EventSyncCoordinator<S, N>,
    command: WatchCommand,
    config: &Config,
) -> Result<Outcome> {
    if !coordinator.initialize().await.is_success() {
        return Ok(Outcome::Failed);
    }

    let poll_interval = command
        .poll_ms
        .map(|ms| Duration::from_millis(ms.max(1)))
        .unwrap_or_else(|| config.notifications.poll_interval());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = tokio::spawn(NotificationPoller::new(poll_interval).run(coordinator.subscribe(), tx));

    println!("Watching for reminders. Press Ctrl-C to stop.");
    let refresh_every = Duration::from_secs(command.refresh_secs.max(1));
    run_until(coordinator, &mut rx, refresh_every, tokio::signal::ctrl_c()).await;

    drop(rx);
    let matcher = poller.await?;
    tracing::debug!(notified = matcher.notified().len(), "Stopped watching");
    Ok(Outcome::Succeeded)
}

/// Prints reminders and refreshes the collection until `shutdown` resolves,
/// including while a refresh is still waiting on the store.
async fn run_until<S, N, F>(
    coordinator: &EventSyncCoordinator<S, N>,
    reminders: &mut mpsc::UnboundedReceiver<DueNotification>,
    refresh_every: Duration,
    shutdown: F,
) where
    S: EventStore,
    N: NoticeSink,
    F: Future,
{
    tokio::pin!(shutdown);

    let mut refresh = tokio::time::interval(refresh_every);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately and the collection is already fresh
    refresh.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(due) = reminders.recv() => print_reminder(&due),
            _ = refresh.tick() => {
                tokio::select! {
                    _ = coordinator.fetch_all() => {}
                    _ = &mut shutdown => break,
                }
            }
        }
    }
}
