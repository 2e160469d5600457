//! Semester — the academic period that gates every schedule entry.
//!
//! At most one semester is active at any instant. Activation is an atomic
//! swap performed by the store; these types only carry the state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Which half of the academic year a semester covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
  First,
  Second,
}

impl Term {
  /// The ordinal (1 or 2) used in display strings and storage.
  pub fn ordinal(self) -> u8 {
    match self {
      Self::First => 1,
      Self::Second => 2,
    }
  }
}

/// An academic semester. `active` is owned by the registry: it flips only
/// through `activate_semester` / `deactivate_semester`, never ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Semester {
  pub semester_id: Uuid,
  pub year:        i32,
  pub term:        Term,
  pub start_date:  NaiveDate,
  pub end_date:    NaiveDate,
  pub active:      bool,
}

/// Input to [`crate::store::AttendanceStore::add_semester`].
/// New semesters always start inactive; `semester_id` is store-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSemester {
  pub year:       i32,
  pub term:       Term,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
}

impl NewSemester {
  /// Reject calendar nonsense before it reaches storage.
  pub fn validate(&self) -> Result<()> {
    if self.start_date >= self.end_date {
      return Err(Error::Validation(format!(
        "semester start {} must precede end {}",
        self.start_date, self.end_date
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn validate_accepts_ordered_dates() {
    let s = NewSemester {
      year:       2024,
      term:       Term::First,
      start_date: date("2024-02-01"),
      end_date:   date("2024-06-30"),
    };
    assert!(s.validate().is_ok());
  }

  #[test]
  fn validate_rejects_inverted_dates() {
    let s = NewSemester {
      year:       2024,
      term:       Term::First,
      start_date: date("2024-06-30"),
      end_date:   date("2024-02-01"),
    };
    assert!(matches!(s.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn term_ordinals() {
    assert_eq!(Term::First.ordinal(), 1);
    assert_eq!(Term::Second.ordinal(), 2);
  }
}
