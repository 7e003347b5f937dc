/*!
 * Access Audit Trail
 * Tracks access decisions and denials per subject
 */

use crate::core::limits::{MAX_AUDIT_EVENTS, MAX_AUDIT_EVENTS_PER_SUBJECT, MAX_AUDIT_SUBJECTS};
use crate::core::Subject;
use crate::permissions::types::AccessDecision;
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::collections::VecDeque;
use std::time::SystemTime;

/// Audit event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warning,
}

/// Audited access decision
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditEvent {
    pub decision: AccessDecision,
    pub severity: AuditSeverity,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub logged_at: SystemTime,
}

impl AuditEvent {
    pub fn new(decision: AccessDecision) -> Self {
        let severity = if decision.is_allowed() {
            AuditSeverity::Info
        } else {
            AuditSeverity::Warning
        };

        Self {
            decision,
            severity,
            logged_at: SystemTime::now(),
        }
    }

    pub fn subject(&self) -> &Subject {
        self.decision.subject()
    }
}

/// In-memory audit logger with bounded history
pub struct AuditLogger {
    /// Global event log (ring buffer)
    events: RwLock<VecDeque<AuditEvent>>,
    /// Per-subject event logs
    subject_events: DashMap<Subject, VecDeque<AuditEvent>, RandomState>,
    /// Denial counters for monitoring
    denial_counts: DashMap<Subject, u64, RandomState>,
    /// Upper bound on subjects tracked in the two maps above
    max_subjects: usize,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self::with_max_subjects(MAX_AUDIT_SUBJECTS)
    }

    pub fn with_max_subjects(max_subjects: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(1024)),
            subject_events: DashMap::with_hasher(RandomState::new()),
            denial_counts: DashMap::with_hasher(RandomState::new()),
            max_subjects: max_subjects.max(1),
        }
    }

    /// Forget an arbitrary subject to make room for a new one
    fn make_room_for(&self, subject: &Subject) {
        if self.subject_events.contains_key(subject)
            || self.subject_events.len() < self.max_subjects
        {
            return;
        }
        // Bind the key first so the iterator's shard lock is released before removal
        let victim = self
            .subject_events
            .iter()
            .next()
            .map(|entry| entry.key().clone());
        if let Some(key) = victim {
            self.subject_events.remove(&key);
            self.denial_counts.remove(&key);
        }
    }

    pub fn log(&self, event: AuditEvent) {
        let subject = event.subject().clone();
        let is_denied = !event.decision.is_allowed();

        {
            let mut events = self.events.write();
            if events.len() >= MAX_AUDIT_EVENTS {
                events.pop_front();
            }
            events.push_back(event.clone());
        }

        self.make_room_for(&subject);
        {
            let mut entry = self.subject_events.entry(subject.clone()).or_default();
            if entry.len() >= MAX_AUDIT_EVENTS_PER_SUBJECT {
                entry.pop_front();
            }
            entry.push_back(event);
        }

        if is_denied {
            *self.denial_counts.entry(subject).or_insert(0) += 1;
        }
    }

    /// Most recent events first
    pub fn recent(&self, limit: usize) -> Vec<AuditEvent> {
        let events = self.events.read();
        events.iter().rev().take(limit).cloned().collect()
    }

    /// Most recent events of one subject first
    pub fn for_subject(&self, subject: &Subject, limit: usize) -> Vec<AuditEvent> {
        self.subject_events
            .get(subject)
            .map(|entry| entry.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn denial_count(&self, subject: &Subject) -> u64 {
        self.denial_counts.get(subject).map(|e| *e).unwrap_or(0)
    }

    pub fn subjects_with_denials(&self) -> Vec<(Subject, u64)> {
        self.denial_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn clear_subject(&self, subject: &Subject) {
        self.subject_events.remove(subject);
        self.denial_counts.remove(subject);
    }

    pub fn clear_all(&self) {
        self.events.write().clear();
        self.subject_events.clear();
        self.denial_counts.clear();
    }

    pub fn stats(&self) -> AuditStats {
        AuditStats {
            total_events: self.events.read().len(),
            total_denials: self.denial_counts.iter().map(|e| *e.value()).sum(),
            subjects_tracked: self.subject_events.len(),
        }
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Audit statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_events: usize,
    pub total_denials: u64,
    pub subjects_tracked: usize,
}
