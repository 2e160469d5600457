//! [`SqliteStore`] — the SQLite implementation of [`AttendanceStore`].
//!
//! Every operation runs as one closure on the dedicated connection thread.
//! Check-then-write sequences therefore serialize against each other, which
//! is what makes `record_attendance` exactly-once per (entry, date) and
//! `activate_semester` swap atomically for all observers.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rollcall_core::{
  attendance::{
    AttendanceRecord, Decision, Excuse, NewAttendance, NewExcuse,
    VerificationStatus,
  },
  error::EligibilityFailure,
  report::{AttendanceSummary, LecturerTally},
  schedule::{DayOfWeek, NewScheduleEntry, ScheduleEntry},
  semester::{NewSemester, Semester},
  store::AttendanceStore,
  Error, Result,
};

use crate::{
  encode::{
    encode_date, encode_day, encode_dt, encode_status, encode_term,
    encode_time, encode_uuid, RawRecord, RawScheduleEntry, RawSemester,
  },
  schema::SCHEMA,
};

fn db_err(e: tokio_rusqlite::Error) -> Error { Error::Storage(e.to_string()) }

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

const RECORD_COLUMNS: &str = "record_id, schedule_id, class_date, \
   recorded_at, recorded_by, present, excuse_document, excuse_comment, \
   excuse_attached_at, status";

const ENTRY_COLUMNS: &str = "schedule_id, subject_id, lecturer_id, \
   department_id, semester_id, day, start_time, end_time";

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
  Ok(RawRecord {
    record_id:          row.get(0)?,
    schedule_id:        row.get(1)?,
    class_date:         row.get(2)?,
    recorded_at:        row.get(3)?,
    recorded_by:        row.get(4)?,
    present:            row.get(5)?,
    excuse_document:    row.get(6)?,
    excuse_comment:     row.get(7)?,
    excuse_attached_at: row.get(8)?,
    status:             row.get(9)?,
  })
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawScheduleEntry> {
  Ok(RawScheduleEntry {
    schedule_id:   row.get(0)?,
    subject_id:    row.get(1)?,
    lecturer_id:   row.get(2)?,
    department_id: row.get(3)?,
    semester_id:   row.get(4)?,
    day:           row.get(5)?,
    start_time:    row.get(6)?,
    end_time:      row.get(7)?,
  })
}

fn semester_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSemester> {
  Ok(RawSemester {
    semester_id: row.get(0)?,
    year:        row.get(1)?,
    term:        row.get(2)?,
    start_date:  row.get(3)?,
    end_date:    row.get(4)?,
    active:      row.get(5)?,
  })
}

// ─── Closure outcomes ────────────────────────────────────────────────────────
//
// Domain decisions made on the connection thread travel back as plain enums;
// the async side maps them onto the core error taxonomy.

enum RecordOutcome {
  NotFound,
  NotLive,
  Duplicate,
  Recorded,
}

enum RemoveOutcome {
  NotFound,
  Conflict,
  Removed,
}

enum MutateOutcome {
  NotFound,
  Ineligible(EligibilityFailure),
  AlreadyFinalized,
  Done(Box<AttendanceRecord>),
  Corrupt(String),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall attendance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(db_err)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(db_err)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  // ── Semester registry ─────────────────────────────────────────────────────

  async fn add_semester(&self, input: NewSemester) -> Result<Semester> {
    input.validate()?;

    let semester = Semester {
      semester_id: Uuid::new_v4(),
      year:        input.year,
      term:        input.term,
      start_date:  input.start_date,
      end_date:    input.end_date,
      active:      false,
    };

    let id_str    = encode_uuid(semester.semester_id);
    let year      = semester.year as i64;
    let term      = encode_term(semester.term);
    let start_str = encode_date(semester.start_date);
    let end_str   = encode_date(semester.end_date);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO semesters (semester_id, year, term, start_date, end_date, active)
           VALUES (?1, ?2, ?3, ?4, ?5, 0)",
          rusqlite::params![id_str, year, term, start_str, end_str],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(db_err)?;

    if !inserted {
      return Err(Error::Validation(format!(
        "semester {}/{} already exists",
        semester.year,
        semester.term.ordinal()
      )));
    }

    Ok(semester)
  }

  async fn list_semesters(&self) -> Result<Vec<Semester>> {
    let raws: Vec<RawSemester> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT semester_id, year, term, start_date, end_date, active
           FROM semesters ORDER BY year DESC, term DESC",
        )?;
        let rows = stmt
          .query_map([], semester_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws.into_iter().map(RawSemester::into_semester).collect()
  }

  async fn activate_semester(&self, id: Uuid) -> Result<Semester> {
    let id_str = encode_uuid(id);

    // The deactivate and activate updates commit in one transaction, so a
    // concurrent `current_semester` reader sees either the old active row
    // or the new one — never both, never neither after success.
    let raw: Option<RawSemester> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM semesters WHERE semester_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(None);
        }

        tx.execute("UPDATE semesters SET active = 0 WHERE active = 1", [])?;
        tx.execute(
          "UPDATE semesters SET active = 1 WHERE semester_id = ?1",
          rusqlite::params![id_str],
        )?;

        let raw = tx.query_row(
          "SELECT semester_id, year, term, start_date, end_date, active
           FROM semesters WHERE semester_id = ?1",
          rusqlite::params![id_str],
          semester_from_row,
        )?;

        tx.commit()?;
        Ok(Some(raw))
      })
      .await
      .map_err(db_err)?;

    raw
      .ok_or(Error::SemesterNotFound(id))?
      .into_semester()
  }

  async fn deactivate_semester(&self) -> Result<Option<Semester>> {
    let raw: Option<RawSemester> = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;

        let raw: Option<RawSemester> = tx
          .query_row(
            "SELECT semester_id, year, term, start_date, end_date, active
             FROM semesters WHERE active = 1",
            [],
            semester_from_row,
          )
          .optional()?;

        if let Some(ref r) = raw {
          tx.execute(
            "UPDATE semesters SET active = 0 WHERE semester_id = ?1",
            rusqlite::params![r.semester_id],
          )?;
        }

        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(db_err)?;

    raw
      .map(|mut r| {
        r.active = false;
        r.into_semester()
      })
      .transpose()
  }

  async fn current_semester(&self) -> Result<Option<Semester>> {
    let raw: Option<RawSemester> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT semester_id, year, term, start_date, end_date, active
               FROM semesters WHERE active = 1",
              [],
              semester_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(db_err)?;

    raw.map(RawSemester::into_semester).transpose()
  }

  // ── Schedule catalog ──────────────────────────────────────────────────────

  async fn add_entry(&self, input: NewScheduleEntry) -> Result<ScheduleEntry> {
    input.validate()?;

    let schedule_id = Uuid::new_v4();

    let sched_str   = encode_uuid(schedule_id);
    let subject_str = encode_uuid(input.subject.subject_id);
    let lect_str    = encode_uuid(input.lecturer.lecturer_id);
    let dept_str    = encode_uuid(input.department_id);
    let day_str     = encode_day(input.day).to_owned();
    let start_str   = encode_time(input.start_time);
    let end_str     = encode_time(input.end_time);

    // The owning semester is resolved and the row inserted on the same
    // connection-thread pass, so an admin deactivating concurrently cannot
    // slip an entry under a stale semester.
    let semester_id_str: Option<String> = self
      .conn
      .call(move |conn| {
        let active: Option<String> = conn
          .query_row(
            "SELECT semester_id FROM semesters WHERE active = 1",
            [],
            |r| r.get(0),
          )
          .optional()?;

        let Some(semester_id) = active else {
          return Ok(None);
        };

        conn.execute(
          "INSERT INTO schedule_entries (
             schedule_id, subject_id, lecturer_id, department_id,
             semester_id, day, start_time, end_time
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            sched_str,
            subject_str,
            lect_str,
            dept_str,
            semester_id,
            day_str,
            start_str,
            end_str,
          ],
        )?;

        Ok(Some(semester_id))
      })
      .await
      .map_err(db_err)?;

    let semester_id_str = semester_id_str.ok_or_else(|| {
      Error::Validation("no active semester to schedule against".to_string())
    })?;

    Ok(ScheduleEntry {
      schedule_id,
      subject_id:    input.subject.subject_id,
      lecturer_id:   input.lecturer.lecturer_id,
      department_id: input.department_id,
      semester_id:   crate::encode::decode_uuid(&semester_id_str)?,
      day:           input.day,
      start_time:    input.start_time,
      end_time:      input.end_time,
    })
  }

  async fn remove_entry(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let outcome: RemoveOutcome = self
      .conn
      .call(move |conn| {
        let live: Option<bool> = conn
          .query_row(
            "SELECT s.active FROM schedule_entries e
             JOIN semesters s ON s.semester_id = e.semester_id
             WHERE e.schedule_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        let Some(live) = live else {
          return Ok(RemoveOutcome::NotFound);
        };

        if live {
          let referenced: bool = conn
            .query_row(
              "SELECT 1 FROM attendance WHERE schedule_id = ?1 LIMIT 1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

          if referenced {
            return Ok(RemoveOutcome::Conflict);
          }
        }

        conn.execute(
          "DELETE FROM schedule_entries WHERE schedule_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(RemoveOutcome::Removed)
      })
      .await
      .map_err(db_err)?;

    match outcome {
      RemoveOutcome::NotFound => Err(Error::ScheduleEntryNotFound(id)),
      RemoveOutcome::Conflict => Err(Error::Conflict(id)),
      RemoveOutcome::Removed => Ok(()),
    }
  }

  async fn get_entry(&self, id: Uuid) -> Result<Option<ScheduleEntry>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawScheduleEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ENTRY_COLUMNS} FROM schedule_entries WHERE schedule_id = ?1"
              ),
              rusqlite::params![id_str],
              entry_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(db_err)?;

    raw.map(RawScheduleEntry::into_entry).transpose()
  }

  async fn live_entries_for(
    &self,
    department_id: Uuid,
    day: DayOfWeek,
  ) -> Result<Vec<ScheduleEntry>> {
    let dept_str = encode_uuid(department_id);
    let day_str  = encode_day(day).to_owned();

    let raws: Vec<RawScheduleEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM schedule_entries e
           JOIN semesters s ON s.semester_id = e.semester_id AND s.active = 1
           WHERE e.department_id = ?1 AND e.day = ?2
           ORDER BY e.start_time",
          entry_columns_qualified()
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![dept_str, day_str], entry_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws.into_iter().map(RawScheduleEntry::into_entry).collect()
  }

  async fn entries_for_lecturer(
    &self,
    lecturer_id: Uuid,
  ) -> Result<Vec<ScheduleEntry>> {
    let lect_str = encode_uuid(lecturer_id);

    let raws: Vec<RawScheduleEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM schedule_entries e
           JOIN semesters s ON s.semester_id = e.semester_id AND s.active = 1
           WHERE e.lecturer_id = ?1
           ORDER BY CASE e.day
             WHEN 'monday' THEN 1 WHEN 'tuesday' THEN 2 WHEN 'wednesday' THEN 3
             WHEN 'thursday' THEN 4 WHEN 'friday' THEN 5 WHEN 'saturday' THEN 6
             ELSE 7 END,
           e.start_time",
          entry_columns_qualified()
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![lect_str], entry_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws.into_iter().map(RawScheduleEntry::into_entry).collect()
  }

  // ── Attendance ledger ─────────────────────────────────────────────────────

  async fn record_attendance(
    &self,
    input: NewAttendance,
    today: NaiveDate,
  ) -> Result<AttendanceRecord> {
    let record = AttendanceRecord {
      record_id:   Uuid::new_v4(),
      schedule_id: input.schedule_id,
      class_date:  today,
      recorded_at: Utc::now(),
      recorded_by: input.recorded_by,
      present:     input.present,
      excuse:      None,
      status:      VerificationStatus::Pending,
    };

    let record_str   = encode_uuid(record.record_id);
    let sched_str    = encode_uuid(record.schedule_id);
    let date_str     = encode_date(record.class_date);
    let at_str       = encode_dt(record.recorded_at);
    let by_str       = encode_uuid(record.recorded_by);
    let present      = record.present;

    let outcome: RecordOutcome = self
      .conn
      .call(move |conn| {
        let live: Option<bool> = conn
          .query_row(
            "SELECT s.active FROM schedule_entries e
             JOIN semesters s ON s.semester_id = e.semester_id
             WHERE e.schedule_id = ?1",
            rusqlite::params![sched_str],
            |r| r.get(0),
          )
          .optional()?;

        match live {
          None => return Ok(RecordOutcome::NotFound),
          Some(false) => return Ok(RecordOutcome::NotLive),
          Some(true) => {}
        }

        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM attendance WHERE schedule_id = ?1 AND class_date = ?2",
            rusqlite::params![sched_str, date_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(RecordOutcome::Duplicate);
        }

        // UNIQUE (schedule_id, class_date) is the backstop should the
        // pre-check ever race; the loser still observes Duplicate.
        match conn.execute(
          "INSERT INTO attendance (
             record_id, schedule_id, class_date, recorded_at, recorded_by,
             present, status
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending')",
          rusqlite::params![record_str, sched_str, date_str, at_str, by_str, present],
        ) {
          Ok(_) => Ok(RecordOutcome::Recorded),
          Err(e) if is_unique_violation(&e) => Ok(RecordOutcome::Duplicate),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(db_err)?;

    match outcome {
      RecordOutcome::NotFound => Err(Error::ScheduleEntryNotFound(input.schedule_id)),
      RecordOutcome::NotLive => Err(Error::NotLive(input.schedule_id)),
      RecordOutcome::Duplicate => Err(Error::Duplicate {
        schedule_id: input.schedule_id,
        class_date:  today,
      }),
      RecordOutcome::Recorded => Ok(record),
    }
  }

  async fn get_record(&self, id: Uuid) -> Result<Option<AttendanceRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECORD_COLUMNS} FROM attendance WHERE record_id = ?1"),
              rusqlite::params![id_str],
              record_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(db_err)?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn record_for(
    &self,
    schedule_id: Uuid,
    class_date: NaiveDate,
  ) -> Result<Option<AttendanceRecord>> {
    let sched_str = encode_uuid(schedule_id);
    let date_str  = encode_date(class_date);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RECORD_COLUMNS} FROM attendance
                 WHERE schedule_id = ?1 AND class_date = ?2"
              ),
              rusqlite::params![sched_str, date_str],
              record_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(db_err)?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn records_for_schedule(
    &self,
    schedule_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>> {
    let sched_str = encode_uuid(schedule_id);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM attendance
           WHERE schedule_id = ?1 ORDER BY recorded_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![sched_str], record_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn pending_for_department(
    &self,
    department_id: Uuid,
  ) -> Result<Vec<AttendanceRecord>> {
    let dept_str = encode_uuid(department_id);

    // Oldest unresolved record first: the queue ordering is a contract of
    // the verification gate.
    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM attendance a
           JOIN schedule_entries e ON e.schedule_id = a.schedule_id
           WHERE e.department_id = ?1 AND a.status = 'pending'
           ORDER BY a.recorded_at ASC",
          record_columns_qualified()
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![dept_str], record_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  // ── Excuse subsystem ──────────────────────────────────────────────────────

  async fn attach_excuse(
    &self,
    record_id: Uuid,
    input: NewExcuse,
    now: DateTime<Utc>,
  ) -> Result<AttendanceRecord> {
    let id_str       = encode_uuid(record_id);
    let document_ref = input.document_ref.clone();
    let comment      = input.comment.clone();
    let now_str      = encode_dt(now);

    let outcome: MutateOutcome = self
      .conn
      .call(move |conn| {
        let raw: Option<RawRecord> = conn
          .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM attendance WHERE record_id = ?1"),
            rusqlite::params![id_str],
            record_from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(MutateOutcome::NotFound);
        };

        let mut record = match raw.into_record() {
          Ok(r) => r,
          Err(e) => return Ok(MutateOutcome::Corrupt(e.to_string())),
        };

        if let Err(reason) = record.excuse_eligibility(now) {
          return Ok(MutateOutcome::Ineligible(reason));
        }

        conn.execute(
          "UPDATE attendance
           SET excuse_document = ?2, excuse_comment = ?3, excuse_attached_at = ?4
           WHERE record_id = ?1",
          rusqlite::params![id_str, document_ref, comment, now_str],
        )?;

        record.excuse = Some(Excuse {
          document_ref,
          comment,
          attached_at: now,
        });
        Ok(MutateOutcome::Done(Box::new(record)))
      })
      .await
      .map_err(db_err)?;

    match outcome {
      MutateOutcome::NotFound => Err(Error::RecordNotFound(record_id)),
      MutateOutcome::Ineligible(reason) => {
        Err(Error::NotEligible { record_id, reason })
      }
      MutateOutcome::AlreadyFinalized => Err(Error::AlreadyFinalized(record_id)),
      MutateOutcome::Corrupt(msg) => Err(Error::Storage(msg)),
      MutateOutcome::Done(record) => Ok(*record),
    }
  }

  // ── Verification gate ─────────────────────────────────────────────────────

  async fn finalize(
    &self,
    record_id: Uuid,
    decision: Decision,
  ) -> Result<AttendanceRecord> {
    let id_str     = encode_uuid(record_id);
    let status     = VerificationStatus::from(decision);
    let status_str = encode_status(status).to_owned();

    let outcome: MutateOutcome = self
      .conn
      .call(move |conn| {
        let raw: Option<RawRecord> = conn
          .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM attendance WHERE record_id = ?1"),
            rusqlite::params![id_str],
            record_from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(MutateOutcome::NotFound);
        };

        let mut record = match raw.into_record() {
          Ok(r) => r,
          Err(e) => return Ok(MutateOutcome::Corrupt(e.to_string())),
        };

        if !record.status.is_pending() {
          return Ok(MutateOutcome::AlreadyFinalized);
        }

        conn.execute(
          "UPDATE attendance SET status = ?2 WHERE record_id = ?1",
          rusqlite::params![id_str, status_str],
        )?;

        record.status = status;
        Ok(MutateOutcome::Done(Box::new(record)))
      })
      .await
      .map_err(db_err)?;

    match outcome {
      MutateOutcome::NotFound => Err(Error::RecordNotFound(record_id)),
      MutateOutcome::Ineligible(reason) => {
        Err(Error::NotEligible { record_id, reason })
      }
      MutateOutcome::AlreadyFinalized => Err(Error::AlreadyFinalized(record_id)),
      MutateOutcome::Corrupt(msg) => Err(Error::Storage(msg)),
      MutateOutcome::Done(record) => Ok(*record),
    }
  }

  // ── Reporting reads ───────────────────────────────────────────────────────

  async fn attendance_summary(
    &self,
    department_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<AttendanceSummary> {
    if from > to {
      return Err(Error::Validation(format!(
        "report range start {from} is after end {to}"
      )));
    }

    let dept_str = encode_uuid(department_id);
    let from_str = encode_date(from);
    let to_str   = encode_date(to);

    let rows: Vec<(String, i64, i64, i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT e.lecturer_id,
                  COUNT(*),
                  SUM(a.present),
                  SUM(CASE WHEN a.status = 'verified' THEN 1 ELSE 0 END),
                  SUM(CASE WHEN a.present = 0 AND a.excuse_document IS NOT NULL
                      THEN 1 ELSE 0 END)
           FROM attendance a
           JOIN schedule_entries e ON e.schedule_id = a.schedule_id
           WHERE e.department_id = ?1 AND a.class_date BETWEEN ?2 AND ?3
           GROUP BY e.lecturer_id
           ORDER BY e.lecturer_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![dept_str, from_str, to_str], |row| {
            Ok((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    let mut per_lecturer = Vec::with_capacity(rows.len());
    let (mut total_recorded, mut total_present, mut total_verified) = (0, 0, 0);

    for (lecturer_str, recorded, present, verified, excused) in rows {
      total_recorded += recorded as u64;
      total_present += present as u64;
      total_verified += verified as u64;
      per_lecturer.push(LecturerTally {
        lecturer_id: crate::encode::decode_uuid(&lecturer_str)?,
        recorded:    recorded as u64,
        present:     present as u64,
        verified:    verified as u64,
        excused:     excused as u64,
      });
    }

    Ok(AttendanceSummary {
      department_id,
      from,
      to,
      total_recorded,
      total_present,
      total_verified,
      per_lecturer,
    })
  }
}

// SELECT lists for joined queries; same order as the row readers expect.
fn entry_columns_qualified() -> String {
  ENTRY_COLUMNS
    .split(", ")
    .map(|c| format!("e.{}", c.trim()))
    .collect::<Vec<_>>()
    .join(", ")
}

fn record_columns_qualified() -> String {
  RECORD_COLUMNS
    .split(", ")
    .map(|c| format!("a.{}", c.trim()))
    .collect::<Vec<_>>()
    .join(", ")
}
