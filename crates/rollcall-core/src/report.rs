//! Aggregate figures the reporting component reads from the ledger.
//!
//! The engine only supplies numbers; rendering (PDF, JSON documents) is an
//! external concern.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-lecturer tally within a reporting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerTally {
  pub lecturer_id: Uuid,
  /// Records in range for this lecturer's classes.
  pub recorded:    u64,
  pub present:     u64,
  pub verified:    u64,
  /// Absences that carry an excuse.
  pub excused:     u64,
}

/// Ledger aggregates for one department over a date range (inclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummary {
  pub department_id:  Uuid,
  pub from:           NaiveDate,
  pub to:             NaiveDate,
  pub total_recorded: u64,
  pub total_present:  u64,
  pub total_verified: u64,
  pub per_lecturer:   Vec<LecturerTally>,
}
