use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Event, EventDraft, EventInput, RepeatInfo};
use crate::notice::{NoticeKind, NoticeSink};
use crate::recurrence::RecurrenceExpander;
use crate::store::EventStore;

/// Whether a coordinator operation reached the store successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Succeeded
    }
}

/// The remote writes a save turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePlan {
    /// A new standalone event.
    CreateOne(EventDraft),
    /// A new recurring event, already expanded.
    CreateBatch(Vec<EventDraft>),
    /// An edit. `new_instances` is non-empty only when a standalone event
    /// just became a series; it holds every expanded date except the
    /// edited event's own, and is created before the update.
    Update { event: Event, new_instances: Vec<EventDraft> },
}

/// Decides which remote writes a save needs.
///
/// # Arguments
/// * `expander` - Recurrence expander for new series
/// * `previous` - The stored version of the edited event, if any
/// * `input` - The draft or edited event being saved
///
/// # Returns
/// * `Result<SavePlan, CoreError>` - The writes to perform, or a configuration error
///
/// # Behavior
/// - New standalone events are created once; new recurring events are expanded and batch-created
/// - An edit that turns a standalone event into a series batch-creates the other dates and
///   updates the edited event in place
/// - Any other edit detaches the event from its series: `repeat` becomes `{none, 0}`
pub fn plan_save(
    expander: &RecurrenceExpander,
    previous: Option<&Event>,
    input: EventInput,
) -> Result<SavePlan, CoreError> {
    match input {
        EventInput::New(draft) if !draft.repeat.is_repeating() => Ok(SavePlan::CreateOne(draft)),
        EventInput::New(draft) => {
            let instances = expander.expand(&draft)?;
            if instances.is_empty() {
                let end_date = draft.repeat.end_date.unwrap_or(expander.config().default_end_date);
                return Err(CoreError::InvalidRecurrence(format!(
                    "repeat end date {} is before the event date {}",
                    end_date, draft.date
                )));
            }
            Ok(SavePlan::CreateBatch(instances))
        }
        EventInput::Existing(mut event) => {
            let becomes_series =
                previous.is_some_and(|p| !p.repeat.is_repeating()) && event.repeat.is_repeating();

            if becomes_series {
                let new_instances: Vec<EventDraft> = expander
                    .expand(&event.to_draft())?
                    .into_iter()
                    .filter(|instance| instance.date != event.date)
                    .collect();
                Ok(SavePlan::Update { event, new_instances })
            } else {
                event.repeat = RepeatInfo::none();
                Ok(SavePlan::Update {
                    event,
                    new_instances: Vec::new(),
                })
            }
        }
    }
}

/// EventSyncCoordinator: the single source of truth for which events exist.
///
/// Every write goes to the store first and is followed by a full re-fetch;
/// the local collection is never patched optimistically. Transport errors
/// are logged and turned into notices, never returned.
pub struct EventSyncCoordinator<S, N> {
    store: S,
    notices: N,
    expander: RecurrenceExpander,
    events: watch::Sender<Arc<Vec<Event>>>,
}

impl<S: EventStore, N: NoticeSink> EventSyncCoordinator<S, N> {
    pub fn new(store: S, notices: N, expander: RecurrenceExpander) -> Self {
        let (events, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            store,
            notices,
            expander,
            events,
        }
    }

    /// Current snapshot of the collection.
    pub fn events(&self) -> Arc<Vec<Event>> {
        self.events.borrow().clone()
    }

    /// Watch the collection; a new value is published on every successful fetch.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Event>>> {
        self.events.subscribe()
    }

    pub fn find(&self, id: Uuid) -> Option<Event> {
        self.events.borrow().iter().find(|e| e.id == id).cloned()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn expander(&self) -> &RecurrenceExpander {
        &self.expander
    }

    // The only place the collection is written.
    fn replace_events(&self, events: Vec<Event>) {
        let mut seen = HashSet::with_capacity(events.len());
        if let Some(dup) = events.iter().find(|e| !seen.insert(e.id)) {
            warn!(id = %dup.id, "Store returned duplicate event id");
        }
        self.events.send_replace(Arc::new(events));
    }

    /// Replaces the collection with the store's current events.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self) -> Outcome {
        match self.store.list_events().await {
            Ok(events) => {
                debug!(count = events.len(), "Fetched events");
                self.replace_events(events);
                Outcome::Succeeded
            }
            Err(err) => {
                error!(error = %err, "Error fetching events");
                self.notices.notify(NoticeKind::LoadFailed.into());
                Outcome::Failed
            }
        }
    }

    /// Start-up load: fetch, then announce the loaded collection.
    pub async fn initialize(&self) -> Outcome {
        let outcome = self.fetch_all().await;
        if outcome.is_success() {
            self.notices.notify(NoticeKind::Loaded.into());
        }
        outcome
    }

    pub async fn save(&self, input: EventInput) -> Result<Outcome, CoreError> {
        self.save_with(input, || {}).await
    }

    /// Saves a new or edited event, then re-fetches and runs `on_saved`.
    ///
    /// Only configuration errors (an unusable recurrence rule) come back as
    /// `Err`, and they are raised before anything is sent to the store.
    #[tracing::instrument(skip_all, fields(edit = input.is_edit()))]
    pub async fn save_with<F>(&self, input: EventInput, on_saved: F) -> Result<Outcome, CoreError>
    where
        F: FnOnce() + Send,
    {
        let is_edit = input.is_edit();
        let previous = match &input {
            EventInput::Existing(event) => self.find(event.id),
            EventInput::New(_) => None,
        };

        let plan = plan_save(&self.expander, previous.as_ref(), input)?;

        if let Err(err) = self.execute(plan).await {
            error!(error = %err, "Error saving event");
            self.notices.notify(NoticeKind::SaveFailed.into());
            return Ok(Outcome::Failed);
        }

        self.fetch_all().await;
        on_saved();
        let kind = if is_edit { NoticeKind::Updated } else { NoticeKind::Added };
        self.notices.notify(kind.into());
        Ok(Outcome::Succeeded)
    }

    async fn execute(&self, plan: SavePlan) -> Result<(), CoreError> {
        match plan {
            SavePlan::CreateOne(draft) => {
                let created = self.store.create_event(&draft).await?;
                info!(id = %created.id, "Created event");
            }
            SavePlan::CreateBatch(drafts) => {
                let created = self.store.create_events(&drafts).await?;
                info!(count = created.len(), "Created recurring events");
            }
            SavePlan::Update { event, new_instances } => {
                if !new_instances.is_empty() {
                    let created = self.store.create_events(&new_instances).await?;
                    info!(id = %event.id, count = created.len(), "Created series instances");
                }
                self.store.update_event(event.id, &event).await?;
                info!(id = %event.id, "Updated event");
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid) -> Outcome {
        if let Err(err) = self.store.delete_event(id).await {
            error!(error = %err, "Error deleting event");
            self.notices.notify(NoticeKind::DeleteFailed.into());
            return Outcome::Failed;
        }

        info!("Deleted event");
        self.fetch_all().await;
        self.notices.notify(NoticeKind::Deleted.into());
        Outcome::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepeatType;
    use chrono::{NaiveDate, NaiveTime};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn draft(date: NaiveDate, repeat: RepeatInfo) -> EventDraft {
        let mut draft = EventDraft::new(
            "Gym",
            date,
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        );
        draft.repeat = repeat;
        draft
    }

    mod plan_save_tests {
        use super::*;

        #[test]
        fn test_new_standalone_is_single_create() {
            let new = draft(d(2024, 5, 1), RepeatInfo::none());
            let plan = plan_save(&RecurrenceExpander::with_defaults(), None, new.clone().into()).unwrap();
            assert_eq!(plan, SavePlan::CreateOne(new));
        }

        #[test]
        fn test_new_recurring_is_batch_create() {
            let new = draft(d(2024, 5, 1), RepeatInfo::every(RepeatType::Weekly, 1).until(d(2024, 5, 15)));
            let plan = plan_save(&RecurrenceExpander::with_defaults(), None, new.into()).unwrap();

            let SavePlan::CreateBatch(instances) = plan else {
                panic!("Expected a batch create");
            };
            let dates: Vec<_> = instances.iter().map(|i| i.date).collect();
            assert_eq!(dates, vec![d(2024, 5, 1), d(2024, 5, 8), d(2024, 5, 15)]);
        }

        #[test]
        fn test_new_recurring_with_zero_interval_is_configuration_error() {
            let new = draft(d(2024, 5, 1), RepeatInfo::every(RepeatType::Daily, 0));
            let result = plan_save(&RecurrenceExpander::with_defaults(), None, new.into());
            assert!(matches!(result, Err(CoreError::InvalidRecurrence(_))));
        }

        #[test]
        fn test_new_recurring_ending_before_start_is_configuration_error() {
            let new = draft(d(2024, 5, 1), RepeatInfo::every(RepeatType::Daily, 1).until(d(2024, 4, 1)));
            let result = plan_save(&RecurrenceExpander::with_defaults(), None, new.into());
            assert!(matches!(result, Err(CoreError::InvalidRecurrence(_))));
        }

        #[test]
        fn test_standalone_becoming_series_excludes_own_date() {
            let previous = draft(d(2024, 1, 31), RepeatInfo::none()).with_id(Uuid::now_v7());
            let mut edited = previous.clone();
            edited.repeat = RepeatInfo::every(RepeatType::Monthly, 1).until(d(2024, 4, 30));

            let plan = plan_save(&RecurrenceExpander::with_defaults(), Some(&previous), edited.clone().into()).unwrap();

            let SavePlan::Update { event, new_instances } = plan else {
                panic!("Expected an update");
            };
            assert_eq!(event, edited);
            assert_eq!(new_instances.len(), 1);
            assert_eq!(new_instances[0].date, d(2024, 3, 31));
        }

        #[test]
        fn test_edit_of_series_instance_detaches_it() {
            let previous = draft(d(2024, 5, 8), RepeatInfo::every(RepeatType::Weekly, 1)).with_id(Uuid::now_v7());
            let mut edited = previous.clone();
            edited.title = "Gym (moved)".to_string();

            let plan = plan_save(&RecurrenceExpander::with_defaults(), Some(&previous), edited.into()).unwrap();

            let SavePlan::Update { event, new_instances } = plan else {
                panic!("Expected an update");
            };
            assert_eq!(event.repeat, RepeatInfo::none());
            assert_eq!(event.title, "Gym (moved)");
            assert!(new_instances.is_empty());
        }

        #[test]
        fn test_edit_without_previous_is_detached() {
            let edited = draft(d(2024, 5, 8), RepeatInfo::every(RepeatType::Daily, 1)).with_id(Uuid::now_v7());
            let plan = plan_save(&RecurrenceExpander::with_defaults(), None, edited.into()).unwrap();
            assert!(matches!(plan, SavePlan::Update { event, new_instances } if event.repeat == RepeatInfo::none() && new_instances.is_empty()));
        }
    }
}
