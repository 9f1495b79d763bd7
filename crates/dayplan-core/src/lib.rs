//! # Dayplan Core Library
//!
//! The engine behind the dayplan calendar: recurring event expansion,
//! synchronization of the client-visible event collection with a remote
//! store, and reminder matching.
//!
//! ## Features
//!
//! - **Recurrence Expansion**: daily, weekly, monthly and yearly rules with
//!   skip-not-clamp handling of dates missing from a month or year
//! - **Server-Wins Synchronization**: every write is followed by a full
//!   re-fetch; transport failures become user notices instead of errors
//! - **Series Transitions**: turning a single event into a series creates the
//!   other occurrences without duplicating the edited one
//! - **Reminders**: each event alerts at most once per session
//!
//! ## Core Modules
//!
//! - [`models`]: Events, drafts and recurrence rules
//! - [`recurrence`]: Recurrence expansion
//! - [`store`]: Remote store trait with HTTP and in-memory implementations
//! - [`sync`]: The event sync coordinator
//! - [`notice`]: User-facing notices
//! - [`notification`]: Reminder matching and polling
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dayplan_core::{
//!     models::{EventDraft, RepeatInfo, RepeatType},
//!     notice::RecordingSink,
//!     recurrence::RecurrenceExpander,
//!     store::HttpEventStore,
//!     sync::EventSyncCoordinator,
//! };
//! use chrono::{NaiveDate, NaiveTime};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dayplan_core::error::CoreError> {
//!     let store = HttpEventStore::new("http://localhost:3000", HttpEventStore::DEFAULT_TIMEOUT)?;
//!     let coordinator = EventSyncCoordinator::new(store, RecordingSink::new(), RecurrenceExpander::with_defaults());
//!     coordinator.initialize().await;
//!
//!     let mut standup = EventDraft::new(
//!         "Daily standup",
//!         NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
//!         NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!         NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
//!     );
//!     standup.repeat = RepeatInfo::every(RepeatType::Daily, 1).until(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
//!
//!     coordinator.save(standup.into()).await?;
//!     println!("{} events", coordinator.events().len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod notice;
pub mod notification;
pub mod recurrence;
pub mod store;
pub mod sync;
