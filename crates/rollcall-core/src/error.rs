//! Error types for `rollcall-core`.
//!
//! Every store operation either commits fully or fails with one of these
//! variants; there are no partial writes and no internal retries. The
//! taxonomy is part of the engine's contract: callers distinguish an
//! expired excuse window from a missing record, and a lost duplicate-submit
//! race from a genuine failure.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Why an excuse could not be attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityFailure {
  /// The record marks the lecturer present; excuses only apply to absences.
  RecordedPresent,
  /// The record already carries an excuse.
  AlreadyExcused,
  /// More than 24 hours have passed since the record was created.
  WindowExpired,
}

impl std::fmt::Display for EligibilityFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::RecordedPresent => write!(f, "record is not an absence"),
      Self::AlreadyExcused => write!(f, "record already has an excuse"),
      Self::WindowExpired => write!(f, "excuse window of 24 hours has expired"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed input — a caller bug, never worth retrying.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("semester not found: {0}")]
  SemesterNotFound(Uuid),

  #[error("schedule entry not found: {0}")]
  ScheduleEntryNotFound(Uuid),

  #[error("attendance record not found: {0}")]
  RecordNotFound(Uuid),

  /// A record for this class occurrence already exists. Expected under a
  /// concurrent-submit race; the loser should treat it as another caller's
  /// success.
  #[error("attendance for schedule {schedule_id} on {class_date} already recorded")]
  Duplicate {
    schedule_id: Uuid,
    class_date:  NaiveDate,
  },

  /// The schedule entry's semester is not currently active.
  #[error("schedule entry {0} is not under the active semester")]
  NotLive(Uuid),

  #[error("excuse not eligible for record {record_id}: {reason}")]
  NotEligible {
    record_id: Uuid,
    reason:    EligibilityFailure,
  },

  /// The record's verification status is already terminal.
  #[error("record {0} is already finalized")]
  AlreadyFinalized(Uuid),

  /// Deletion blocked because attendance history references the entry.
  #[error("schedule entry {0} has attendance history under the active semester")]
  Conflict(Uuid),

  /// The caller's role or department scope does not permit the operation.
  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  /// A fault in the storage backend; nothing the caller did wrong.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
