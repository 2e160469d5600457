//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates and times as their ISO
//! forms, UUIDs as hyphenated lowercase strings, and closed enums as the
//! lowercase words the `serde` renames use.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rollcall_core::{
  attendance::{AttendanceRecord, Excuse, VerificationStatus},
  schedule::{DayOfWeek, ScheduleEntry},
  semester::{Semester, Term},
  Error, Result,
};
use uuid::Uuid;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| Error::Storage(format!("bad uuid {s:?}: {e}")))
}

// ─── Temporal ────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Storage(format!("bad timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e| Error::Storage(format!("bad date {s:?}: {e}")))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  s.parse()
    .map_err(|e| Error::Storage(format!("bad time {s:?}: {e}")))
}

// ─── Term ────────────────────────────────────────────────────────────────────

pub fn encode_term(t: Term) -> i64 { t.ordinal() as i64 }

pub fn decode_term(n: i64) -> Result<Term> {
  match n {
    1 => Ok(Term::First),
    2 => Ok(Term::Second),
    other => Err(Error::Storage(format!("unknown term ordinal: {other}"))),
  }
}

// ─── DayOfWeek ───────────────────────────────────────────────────────────────

pub fn encode_day(d: DayOfWeek) -> &'static str {
  match d {
    DayOfWeek::Monday => "monday",
    DayOfWeek::Tuesday => "tuesday",
    DayOfWeek::Wednesday => "wednesday",
    DayOfWeek::Thursday => "thursday",
    DayOfWeek::Friday => "friday",
    DayOfWeek::Saturday => "saturday",
    DayOfWeek::Sunday => "sunday",
  }
}

pub fn decode_day(s: &str) -> Result<DayOfWeek> {
  match s {
    "monday" => Ok(DayOfWeek::Monday),
    "tuesday" => Ok(DayOfWeek::Tuesday),
    "wednesday" => Ok(DayOfWeek::Wednesday),
    "thursday" => Ok(DayOfWeek::Thursday),
    "friday" => Ok(DayOfWeek::Friday),
    "saturday" => Ok(DayOfWeek::Saturday),
    "sunday" => Ok(DayOfWeek::Sunday),
    other => Err(Error::Storage(format!("unknown day: {other:?}"))),
  }
}

// ─── VerificationStatus ──────────────────────────────────────────────────────

pub fn encode_status(s: VerificationStatus) -> &'static str {
  match s {
    VerificationStatus::Pending => "pending",
    VerificationStatus::Verified => "verified",
    VerificationStatus::Rejected => "rejected",
  }
}

pub fn decode_status(s: &str) -> Result<VerificationStatus> {
  match s {
    "pending" => Ok(VerificationStatus::Pending),
    "verified" => Ok(VerificationStatus::Verified),
    "rejected" => Ok(VerificationStatus::Rejected),
    other => Err(Error::Storage(format!("unknown status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `semesters` row.
pub struct RawSemester {
  pub semester_id: String,
  pub year:        i64,
  pub term:        i64,
  pub start_date:  String,
  pub end_date:    String,
  pub active:      bool,
}

impl RawSemester {
  pub fn into_semester(self) -> Result<Semester> {
    Ok(Semester {
      semester_id: decode_uuid(&self.semester_id)?,
      year:        self.year as i32,
      term:        decode_term(self.term)?,
      start_date:  decode_date(&self.start_date)?,
      end_date:    decode_date(&self.end_date)?,
      active:      self.active,
    })
  }
}

/// Raw strings read directly from a `schedule_entries` row.
pub struct RawScheduleEntry {
  pub schedule_id:   String,
  pub subject_id:    String,
  pub lecturer_id:   String,
  pub department_id: String,
  pub semester_id:   String,
  pub day:           String,
  pub start_time:    String,
  pub end_time:      String,
}

impl RawScheduleEntry {
  pub fn into_entry(self) -> Result<ScheduleEntry> {
    Ok(ScheduleEntry {
      schedule_id:   decode_uuid(&self.schedule_id)?,
      subject_id:    decode_uuid(&self.subject_id)?,
      lecturer_id:   decode_uuid(&self.lecturer_id)?,
      department_id: decode_uuid(&self.department_id)?,
      semester_id:   decode_uuid(&self.semester_id)?,
      day:           decode_day(&self.day)?,
      start_time:    decode_time(&self.start_time)?,
      end_time:      decode_time(&self.end_time)?,
    })
  }
}

/// Raw strings read directly from an `attendance` row.
pub struct RawRecord {
  pub record_id:          String,
  pub schedule_id:        String,
  pub class_date:         String,
  pub recorded_at:        String,
  pub recorded_by:        String,
  pub present:            bool,
  pub excuse_document:    Option<String>,
  pub excuse_comment:     Option<String>,
  pub excuse_attached_at: Option<String>,
  pub status:             String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    // The excuse columns are written together; a document without its
    // attachment timestamp is a storage fault.
    let excuse = match (self.excuse_document, self.excuse_attached_at) {
      (Some(document_ref), Some(at)) => Some(Excuse {
        document_ref,
        comment: self.excuse_comment,
        attached_at: decode_dt(&at)?,
      }),
      (None, None) => None,
      _ => {
        return Err(Error::Storage(format!(
          "record {} has torn excuse columns",
          self.record_id
        )))
      }
    };

    Ok(AttendanceRecord {
      record_id:   decode_uuid(&self.record_id)?,
      schedule_id: decode_uuid(&self.schedule_id)?,
      class_date:  decode_date(&self.class_date)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      recorded_by: decode_uuid(&self.recorded_by)?,
      present:     self.present,
      excuse,
      status:      decode_status(&self.status)?,
    })
  }
}
