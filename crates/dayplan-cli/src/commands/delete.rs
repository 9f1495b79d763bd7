use anyhow::{anyhow, Context, Result};
use dayplan_core::notice::NoticeSink;
use dayplan_core::store::EventStore;
use dayplan_core::sync::{EventSyncCoordinator, Outcome};
use dialoguer::Confirm;

use crate::cli::DeleteCommand;
use crate::util::resolve_event_id;

pub async fn delete_event<S: EventStore, N: NoticeSink>(
    coordinator: &EventSyncCoordinator<S, N>,
    command: DeleteCommand,
) -> Result<Outcome> {
    if !coordinator.fetch_all().await.is_success() {
        return Ok(Outcome::Failed);
    }

    let event_id = resolve_event_id(&coordinator.events(), &command.id)?;
    let event = coordinator
        .find(event_id)
        .ok_or_else(|| anyhow!("Event not found"))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete '{}' on {}?",
                event.title, event.date
            ))
            .default(false)
            .interact()
            .context("Could not ask for confirmation; pass --force to delete without a prompt")?;

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(Outcome::Succeeded);
        }
    }

    Ok(coordinator.delete_event(event_id).await)
}
