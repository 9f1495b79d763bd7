use dayplan_core::error::CoreError;
use dayplan_core::models::Event;
use uuid::Uuid;

/// Finds the one event whose id starts with `short_id`.
pub fn resolve_event_id(events: &[Event], short_id: &str) -> Result<Uuid, CoreError> {
    if short_id.len() < 2 {
        return Err(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string(),
        ));
    }
    let prefix = short_id.to_lowercase();
    let matches: Vec<&Event> = events
        .iter()
        .filter(|e| e.id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [event] => Ok(event.id),
        [] => Err(CoreError::NotFound(format!(
            "No event found with ID prefix '{}'",
            short_id
        ))),
        _ => Err(CoreError::AmbiguousId(
            matches
                .into_iter()
                .map(|e| (e.id.to_string(), e.title.clone()))
                .collect(),
        )),
    }
}
