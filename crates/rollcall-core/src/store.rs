//! The `AttendanceStore` trait — the engine's single seam to storage.
//!
//! The trait is implemented by storage backends (e.g.
//! `rollcall-store-sqlite`). Higher layers (`rollcall-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (tokio with `axum`). Every method returns
//! the crate-wide [`Error`] taxonomy directly: the error variants are part
//! of the engine's contract, and callers map them without downcasting.
//!
//! # Atomicity contract
//!
//! - `record_attendance` is serialized per (schedule entry, date): exactly
//!   one concurrent submission for the same class occurrence succeeds; every
//!   other observes [`Error::Duplicate`].
//! - `activate_semester` / `deactivate_semester` serialize against each
//!   other and against `current_semester` readers: no observer ever sees
//!   two active semesters or a torn state.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  attendance::{AttendanceRecord, Decision, NewAttendance, NewExcuse},
  report::AttendanceSummary,
  schedule::{DayOfWeek, NewScheduleEntry, ScheduleEntry},
  semester::{NewSemester, Semester},
  Error,
};

type Result<T> = crate::Result<T, Error>;

/// Abstraction over a Rollcall attendance engine backend.
pub trait AttendanceStore: Send + Sync {
  // ── Semester registry ─────────────────────────────────────────────────

  /// Create a semester (inactive). Fails `Validation` on inverted dates or
  /// a duplicate (year, term) pair.
  fn add_semester(
    &self,
    input: NewSemester,
  ) -> impl Future<Output = Result<Semester>> + Send + '_;

  /// All semesters, newest academic period first.
  fn list_semesters(
    &self,
  ) -> impl Future<Output = Result<Vec<Semester>>> + Send + '_;

  /// Atomically make `id` the single active semester. Any previously active
  /// semester is deactivated in the same step; its schedule entries become
  /// non-live read-only history, untouched otherwise.
  fn activate_semester(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Semester>> + Send + '_;

  /// Deactivate the active semester, if any. Idempotent: returns `None`
  /// (not an error) when no semester was active.
  fn deactivate_semester(
    &self,
  ) -> impl Future<Output = Result<Option<Semester>>> + Send + '_;

  /// The currently active semester, or `None`.
  fn current_semester(
    &self,
  ) -> impl Future<Output = Result<Option<Semester>>> + Send + '_;

  // ── Schedule catalog ──────────────────────────────────────────────────

  /// Add a timetable entry under the currently active semester. Fails
  /// `Validation` when the input is inconsistent or when no semester is
  /// active. Lecturer double-booking is accepted by design.
  fn add_entry(
    &self,
    input: NewScheduleEntry,
  ) -> impl Future<Output = Result<ScheduleEntry>> + Send + '_;

  /// Remove an entry. Fails `Conflict` when the entry's semester is active
  /// and attendance history already references it.
  fn remove_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Retrieve an entry by id. Returns `None` if not found.
  fn get_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ScheduleEntry>>> + Send + '_;

  /// Live entries of a department on `day`, ordered by start time. This is
  /// the "today's schedule" query a CR works from.
  fn live_entries_for(
    &self,
    department_id: Uuid,
    day: DayOfWeek,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>>> + Send + '_;

  /// Live entries taught by one lecturer, ordered by day then start time.
  fn entries_for_lecturer(
    &self,
    lecturer_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>>> + Send + '_;

  // ── Attendance ledger ─────────────────────────────────────────────────

  /// Record attendance for a class occurrence. The single mutation point of
  /// the ledger; see the atomicity contract above. `today` is the calendar
  /// date of the occurrence — the ledger accepts no backdating, so callers
  /// pass the current date.
  fn record_attendance(
    &self,
    input: NewAttendance,
    today: NaiveDate,
  ) -> impl Future<Output = Result<AttendanceRecord>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AttendanceRecord>>> + Send + '_;

  /// The record for one class occurrence, if submitted.
  fn record_for(
    &self,
    schedule_id: Uuid,
    class_date: NaiveDate,
  ) -> impl Future<Output = Result<Option<AttendanceRecord>>> + Send + '_;

  /// Full history for one schedule entry, newest first.
  fn records_for_schedule(
    &self,
    schedule_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>>> + Send + '_;

  /// Pending records of a department, ordered `recorded_at` ascending —
  /// oldest unresolved absence first. The ordering is a contract the
  /// verification queue relies on, not an incidental default.
  fn pending_for_department(
    &self,
    department_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>>> + Send + '_;

  // ── Excuse subsystem ──────────────────────────────────────────────────

  /// Attach a documentary excuse to an absence. `now` is the attachment
  /// instant measured against the record's 24-hour window (inclusive).
  /// Leaves the verification status untouched.
  fn attach_excuse(
    &self,
    record_id: Uuid,
    input: NewExcuse,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<AttendanceRecord>> + Send + '_;

  // ── Verification gate ─────────────────────────────────────────────────

  /// Close a pending record with a terminal decision. Irreversible; a
  /// second call fails `AlreadyFinalized` whatever the decision.
  fn finalize(
    &self,
    record_id: Uuid,
    decision: Decision,
  ) -> impl Future<Output = Result<AttendanceRecord>> + Send + '_;

  // ── Reporting reads ───────────────────────────────────────────────────

  /// Ledger aggregates for one department over an inclusive date range.
  fn attendance_summary(
    &self,
    department_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
  ) -> impl Future<Output = Result<AttendanceSummary>> + Send + '_;
}
