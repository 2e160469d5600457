//! Schedule entries — the recurring weekly timetable of a department.
//!
//! An entry is only "live" while its owning semester is active. Entries are
//! immutable once created; the only mutation is deletion, and the store
//! refuses that when attendance history under the active semester would be
//! orphaned.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Day of week ─────────────────────────────────────────────────────────────

/// The weekday of a recurring class slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl From<chrono::Weekday> for DayOfWeek {
  fn from(w: chrono::Weekday) -> Self {
    match w {
      chrono::Weekday::Mon => Self::Monday,
      chrono::Weekday::Tue => Self::Tuesday,
      chrono::Weekday::Wed => Self::Wednesday,
      chrono::Weekday::Thu => Self::Thursday,
      chrono::Weekday::Fri => Self::Friday,
      chrono::Weekday::Sat => Self::Saturday,
      chrono::Weekday::Sun => Self::Sunday,
    }
  }
}

// ─── Typed org references ────────────────────────────────────────────────────

/// Reference to a subject, as handed over by the upstream org provider.
/// Carries the subject's department so the catalog can check that subject
/// and lecturer belong together without owning organizational data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubjectRef {
  pub subject_id:    Uuid,
  pub department_id: Uuid,
}

/// Reference to a lecturer, as handed over by the upstream org provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LecturerRef {
  pub lecturer_id:   Uuid,
  pub department_id: Uuid,
}

// ─── Schedule entry ──────────────────────────────────────────────────────────

/// One recurring weekly class slot under a semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub schedule_id:   Uuid,
  pub subject_id:    Uuid,
  pub lecturer_id:   Uuid,
  pub department_id: Uuid,
  /// The semester the entry belongs to, fixed at creation time.
  pub semester_id:   Uuid,
  pub day:           DayOfWeek,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
}

/// Input to [`crate::store::AttendanceStore::add_entry`]. The owning
/// semester is not accepted from callers — it is always the currently
/// active one, resolved by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewScheduleEntry {
  pub subject:       SubjectRef,
  pub lecturer:      LecturerRef,
  pub department_id: Uuid,
  pub day:           DayOfWeek,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
}

impl NewScheduleEntry {
  /// Local validation: time ordering and department consistency.
  ///
  /// Overlap with other entries for the same lecturer is deliberately NOT
  /// checked here. Double-booking is surfaced as a soft warning by the UI;
  /// the catalog accepts it.
  pub fn validate(&self) -> Result<()> {
    if self.start_time >= self.end_time {
      return Err(Error::Validation(format!(
        "class start {} must precede end {}",
        self.start_time, self.end_time
      )));
    }
    if self.subject.department_id != self.department_id {
      return Err(Error::Validation(
        "subject does not belong to the entry's department".to_string(),
      ));
    }
    if self.lecturer.department_id != self.department_id {
      return Err(Error::Validation(
        "lecturer does not belong to the entry's department".to_string(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn time(s: &str) -> NaiveTime { s.parse().unwrap() }

  fn entry(dept: Uuid, subject_dept: Uuid, lecturer_dept: Uuid) -> NewScheduleEntry {
    NewScheduleEntry {
      subject:       SubjectRef { subject_id: Uuid::new_v4(), department_id: subject_dept },
      lecturer:      LecturerRef { lecturer_id: Uuid::new_v4(), department_id: lecturer_dept },
      department_id: dept,
      day:           DayOfWeek::Monday,
      start_time:    time("09:00:00"),
      end_time:      time("10:00:00"),
    }
  }

  #[test]
  fn validate_accepts_consistent_entry() {
    let dept = Uuid::new_v4();
    assert!(entry(dept, dept, dept).validate().is_ok());
  }

  #[test]
  fn validate_rejects_zero_length_slot() {
    let dept = Uuid::new_v4();
    let mut e = entry(dept, dept, dept);
    e.end_time = e.start_time;
    assert!(matches!(e.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn validate_rejects_foreign_subject() {
    let dept = Uuid::new_v4();
    let e = entry(dept, Uuid::new_v4(), dept);
    assert!(matches!(e.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn validate_rejects_foreign_lecturer() {
    let dept = Uuid::new_v4();
    let e = entry(dept, dept, Uuid::new_v4());
    assert!(matches!(e.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn day_of_week_from_chrono() {
    assert_eq!(DayOfWeek::from(chrono::Weekday::Mon), DayOfWeek::Monday);
    assert_eq!(DayOfWeek::from(chrono::Weekday::Sun), DayOfWeek::Sunday);
  }
}
