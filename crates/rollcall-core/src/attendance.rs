//! Attendance records — the append-mostly ledger at the heart of the engine.
//!
//! A record is written once by a CR, may gain an excuse within a bounded
//! window, and is closed exactly once by the verification gate. Nothing
//! else ever mutates it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EligibilityFailure;

/// How long after record creation an excuse may still be attached.
/// The boundary is inclusive: exactly 24 hours is accepted.
pub fn excuse_window() -> Duration { Duration::hours(24) }

// ─── Verification ────────────────────────────────────────────────────────────

/// Lifecycle state of a record. `Pending` is the initial state; the two
/// terminal states are never left once entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
  Pending,
  Verified,
  Rejected,
}

impl VerificationStatus {
  pub fn is_pending(self) -> bool { matches!(self, Self::Pending) }
}

/// The HOD's terminal decision on a pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
  Verified,
  Rejected,
}

impl From<Decision> for VerificationStatus {
  fn from(d: Decision) -> Self {
    match d {
      Decision::Verified => Self::Verified,
      Decision::Rejected => Self::Rejected,
    }
  }
}

// ─── Excuse ──────────────────────────────────────────────────────────────────

/// A documentary excuse attached to an absence. The document itself lives in
/// an external store; the engine only keeps the opaque reference and the
/// moment of attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excuse {
  pub document_ref: String,
  pub comment:      Option<String>,
  pub attached_at:  DateTime<Utc>,
}

/// Input to [`crate::store::AttendanceStore::attach_excuse`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewExcuse {
  pub document_ref: String,
  pub comment:      Option<String>,
}

// ─── Attendance record ───────────────────────────────────────────────────────

/// One attendance record per (schedule entry, calendar date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub record_id:   Uuid,
  pub schedule_id: Uuid,
  pub class_date:  NaiveDate,
  /// Server-assigned; also the start of the excuse window.
  pub recorded_at: DateTime<Utc>,
  /// The CR who submitted the record.
  pub recorded_by: Uuid,
  pub present:     bool,
  pub excuse:      Option<Excuse>,
  pub status:      VerificationStatus,
}

impl AttendanceRecord {
  /// Check whether an excuse may be attached at `now`, per the eligibility
  /// rules: absence only, first excuse only, within the 24-hour window
  /// measured from `recorded_at` (boundary inclusive).
  pub fn excuse_eligibility(&self, now: DateTime<Utc>) -> Result<(), EligibilityFailure> {
    if self.present {
      return Err(EligibilityFailure::RecordedPresent);
    }
    if self.excuse.is_some() {
      return Err(EligibilityFailure::AlreadyExcused);
    }
    if now - self.recorded_at > excuse_window() {
      return Err(EligibilityFailure::WindowExpired);
    }
    Ok(())
  }
}

/// Input to [`crate::store::AttendanceStore::record_attendance`].
/// `recorded_at` and the verification status are set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendance {
  pub schedule_id: Uuid,
  pub present:     bool,
  pub recorded_by: Uuid,
}
