//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS semesters (
    semester_id TEXT PRIMARY KEY,
    year        INTEGER NOT NULL,
    term        INTEGER NOT NULL,   -- 1 | 2
    start_date  TEXT NOT NULL,      -- ISO 8601 date
    end_date    TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 0,
    UNIQUE (year, term)
);

-- Hard backstop for the single-active-semester invariant: the partial
-- index admits at most one row with active = 1.
CREATE UNIQUE INDEX IF NOT EXISTS semesters_one_active_idx
    ON semesters(active) WHERE active = 1;

CREATE TABLE IF NOT EXISTS schedule_entries (
    schedule_id   TEXT PRIMARY KEY,
    subject_id    TEXT NOT NULL,
    lecturer_id   TEXT NOT NULL,
    department_id TEXT NOT NULL,
    semester_id   TEXT NOT NULL REFERENCES semesters(semester_id),
    day           TEXT NOT NULL,    -- 'monday' .. 'sunday'
    start_time    TEXT NOT NULL,    -- HH:MM:SS
    end_time      TEXT NOT NULL
);

-- Attendance is append-mostly: rows are inserted once, then touched only by
-- the excuse columns (at most once) and the status column (at most once).
-- schedule_id intentionally carries no foreign key: ledger history outlives
-- the deletion of a non-live schedule entry.
CREATE TABLE IF NOT EXISTS attendance (
    record_id          TEXT PRIMARY KEY,
    schedule_id        TEXT NOT NULL,
    class_date         TEXT NOT NULL,
    recorded_at        TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    recorded_by        TEXT NOT NULL,
    present            INTEGER NOT NULL,
    excuse_document    TEXT,
    excuse_comment     TEXT,
    excuse_attached_at TEXT,
    status             TEXT NOT NULL DEFAULT 'pending',
    UNIQUE (schedule_id, class_date)
);

CREATE INDEX IF NOT EXISTS schedule_semester_idx   ON schedule_entries(semester_id);
CREATE INDEX IF NOT EXISTS schedule_department_idx ON schedule_entries(department_id);
CREATE INDEX IF NOT EXISTS attendance_schedule_idx ON attendance(schedule_id);
CREATE INDEX IF NOT EXISTS attendance_status_idx   ON attendance(status);
CREATE INDEX IF NOT EXISTS attendance_date_idx     ON attendance(class_date);

PRAGMA user_version = 1;
";
