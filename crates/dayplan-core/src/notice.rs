//! User-facing notices raised by the sync coordinator.
//!
//! The coordinator never returns transport errors to its caller. Instead
//! every outcome of a load, save or delete becomes a [`Notice`] delivered
//! to a [`NoticeSink`], which the front end renders however it likes.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

const SHORT: Duration = Duration::from_millis(1000);
const STANDARD: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Loaded,
    LoadFailed,
    Added,
    Updated,
    SaveFailed,
    Deleted,
    DeleteFailed,
}

impl NoticeKind {
    pub fn severity(self) -> Severity {
        match self {
            NoticeKind::Loaded | NoticeKind::Deleted => Severity::Info,
            NoticeKind::Added | NoticeKind::Updated => Severity::Success,
            NoticeKind::LoadFailed | NoticeKind::SaveFailed | NoticeKind::DeleteFailed => Severity::Error,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            NoticeKind::Loaded => "Events loaded.",
            NoticeKind::LoadFailed => "Failed to load events",
            NoticeKind::Added => "Event added.",
            NoticeKind::Updated => "Event updated.",
            NoticeKind::SaveFailed => "Failed to save event",
            NoticeKind::Deleted => "Event deleted.",
            NoticeKind::DeleteFailed => "Failed to delete event",
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            NoticeKind::Loaded => SHORT,
            _ => STANDARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub severity: Severity,
    pub title: &'static str,
    pub duration: Duration,
}

impl From<NoticeKind> for Notice {
    fn from(kind: NoticeKind) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            title: kind.title(),
            duration: kind.duration(),
        }
    }
}

/// Receives notices; implementations must not block.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl NoticeSink for UnboundedSender<Notice> {
    fn notify(&self, notice: Notice) {
        // A closed receiver means nobody is displaying notices anymore.
        let _ = self.send(notice);
    }
}

impl<T: NoticeSink + ?Sized> NoticeSink for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Keeps every notice in memory; cloning shares the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.notices().into_iter().map(|n| n.kind).collect()
    }
}

impl NoticeSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
