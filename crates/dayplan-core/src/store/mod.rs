use crate::error::CoreError;
use crate::models::{Event, EventDraft};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub mod http;
pub mod memory;

pub use http::HttpEventStore;
pub use memory::{InMemoryEventStore, StoreCall, StoreOperation};

/// The remote event store the sync coordinator talks to.
///
/// Every failure (network, non-2xx, not-found) surfaces as a transport
/// kind of [`CoreError`].
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, CoreError>;
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, CoreError>;
    async fn create_events(&self, drafts: &[EventDraft]) -> Result<Vec<Event>, CoreError>;
    async fn update_event(&self, id: Uuid, event: &Event) -> Result<Event, CoreError>;
    async fn delete_event(&self, id: Uuid) -> Result<(), CoreError>;
}

#[async_trait]
impl<T: EventStore + ?Sized> EventStore for Arc<T> {
    async fn list_events(&self) -> Result<Vec<Event>, CoreError> {
        (**self).list_events().await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, CoreError> {
        (**self).create_event(draft).await
    }

    async fn create_events(&self, drafts: &[EventDraft]) -> Result<Vec<Event>, CoreError> {
        (**self).create_events(drafts).await
    }

    async fn update_event(&self, id: Uuid, event: &Event) -> Result<Event, CoreError> {
        (**self).update_event(id, event).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), CoreError> {
        (**self).delete_event(id).await
    }
}
