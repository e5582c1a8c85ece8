//! Bounded in-memory audit trail.
//!
//! The trail is a fixed-capacity ring: once full, every append evicts the
//! oldest entry. Appends never fail — losing an audit record must not fail
//! the request that produced it, so a poisoned lock is recovered rather
//! than propagated.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use wajha_entity::audit::{AuditAction, AuditLogEntry, NewAuditEvent};

/// Filters for querying the audit trail. All fields combine with AND;
/// an unset field matches everything.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub resource: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Fixed-capacity, newest-first audit trail.
#[derive(Debug)]
pub struct AuditLog {
    capacity: usize,
    entries: Mutex<VecDeque<AuditLogEntry>>,
}

impl AuditLog {
    /// Creates an empty trail holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<AuditLogEntry>> {
        // Audit appends must survive a panicked holder; the queue itself
        // stays structurally valid.
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records an event, evicting the oldest entry when full.
    pub fn append(&self, event: NewAuditEvent) -> AuditLogEntry {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            user_id: event.user_id,
            action: event.action,
            resource: event.resource,
            resource_id: event.resource_id,
            details: event.details,
            ip_address: event.ip_address,
            user_agent: event.user_agent,
            timestamp: Utc::now(),
            success: event.success,
            error: event.error,
        };

        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            if let Some(evicted) = entries.pop_front() {
                warn!(
                    entry_id = %evicted.id,
                    action = %evicted.action,
                    "Audit trail full, oldest entry evicted"
                );
            }
        }
        entries.push_back(entry.clone());
        entry
    }

    /// Returns matching entries, newest first.
    pub fn query(&self, filter: &AuditQuery) -> Vec<AuditLogEntry> {
        let entries = self.lock();
        let limit = filter.limit.unwrap_or(usize::MAX);

        entries
            .iter()
            .rev()
            .filter(|e| filter.user_id.is_none_or(|id| e.user_id == Some(id)))
            .filter(|e| filter.action.is_none_or(|a| e.action == a))
            .filter(|e| {
                filter
                    .resource
                    .as_deref()
                    .is_none_or(|r| e.resource.eq_ignore_ascii_case(r))
            })
            .filter(|e| filter.start_date.is_none_or(|s| e.timestamp >= s))
            .filter(|e| filter.end_date.is_none_or(|s| e.timestamp <= s))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
