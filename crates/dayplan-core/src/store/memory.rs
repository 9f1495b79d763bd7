use crate::error::CoreError;
use crate::models::{Event, EventDraft};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Create,
    CreateBatch,
    Update,
    Delete,
}

/// One request received by [`InMemoryEventStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create(EventDraft),
    CreateBatch(Vec<EventDraft>),
    Update(Uuid, Event),
    Delete(Uuid),
}

impl StoreCall {
    pub fn operation(&self) -> StoreOperation {
        match self {
            StoreCall::List => StoreOperation::List,
            StoreCall::Create(_) => StoreOperation::Create,
            StoreCall::CreateBatch(_) => StoreOperation::CreateBatch,
            StoreCall::Update(..) => StoreOperation::Update,
            StoreCall::Delete(_) => StoreOperation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<Event>,
    calls: Vec<StoreCall>,
    pending_failures: HashSet<StoreOperation>,
}

/// In-process event store.
///
/// Assigns UUIDv7 ids, records every call and can be told to fail the next
/// call of a given operation. Backs the tests and the CLI's offline mode.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    state: Mutex<MemoryState>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                events,
                ..Default::default()
            }),
        }
    }

    /// Make the next call of `operation` fail with a transport error.
    pub async fn fail_next(&self, operation: StoreOperation) {
        self.state.lock().await.pending_failures.insert(operation);
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    pub async fn events(&self) -> Vec<Event> {
        self.state.lock().await.events.clone()
    }
}

impl MemoryState {
    fn record(&mut self, call: StoreCall) -> Result<(), CoreError> {
        let operation = call.operation();
        self.calls.push(call);
        if self.pending_failures.remove(&operation) {
            return Err(CoreError::Transport(format!("injected {operation:?} failure")));
        }
        Ok(())
    }

    fn position(&self, id: Uuid) -> Result<usize, CoreError> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::Status {
                status: 404,
                url: format!("/api/events/{id}"),
            })
    }

    fn insert(&mut self, draft: &EventDraft) -> Event {
        let event = draft.clone().with_id(Uuid::now_v7());
        self.events.push(event.clone());
        event
    }
}

#[async_trait]
impl super::EventStore for InMemoryEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, CoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::List)?;
        Ok(state.events.clone())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, CoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Create(draft.clone()))?;
        Ok(state.insert(draft))
    }

    async fn create_events(&self, drafts: &[EventDraft]) -> Result<Vec<Event>, CoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::CreateBatch(drafts.to_vec()))?;
        Ok(drafts.iter().map(|draft| state.insert(draft)).collect())
    }

    async fn update_event(&self, id: Uuid, event: &Event) -> Result<Event, CoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Update(id, event.clone()))?;
        let index = state.position(id)?;
        let updated = Event { id, ..event.clone() };
        state.events[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreCall::Delete(id))?;
        let index = state.position(id)?;
        state.events.remove(index);
        Ok(())
    }
}
