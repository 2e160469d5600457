//! Handlers for `/attendance` endpoints — the ledger, the excuse subsystem
//! and the verification gate.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/attendance` | CR; body: [`RecordBody`]; always for the current day |
//! | `GET`  | `/attendance/{id}` | Single record |
//! | `GET`  | `/attendance?schedule_id` | History of one entry, newest first |
//! | `GET`  | `/attendance/pending` | HOD; own department, oldest first |
//! | `POST` | `/attendance/{id}/excuse` | Lecturer owning the class |
//! | `POST` | `/attendance/{id}/verify` | HOD; body: `{"decision":"verified"}` |

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use rollcall_core::{
  attendance::{AttendanceRecord, Decision, NewAttendance, NewExcuse},
  identity::Role,
  schedule::ScheduleEntry,
  store::AttendanceStore,
  Error as CoreError,
};

use crate::{error::ApiError, identity::Caller};

// ─── Record ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /attendance`. The recording CR and the date
/// are never taken from the body: the CR is the caller, and the ledger only
/// accepts today.
#[derive(Debug, Deserialize)]
pub struct RecordBody {
  pub schedule_id: Uuid,
  pub present:     bool,
}

/// `POST /attendance` — returns 201 + the stored record.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<RecordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Cr)?;
  let record = store
    .record_attendance(
      NewAttendance {
        schedule_id: body.schedule_id,
        present:     body.present,
        recorded_by: caller.user_id,
      },
      Utc::now().date_naive(),
    )
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /attendance/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<AttendanceRecord>, ApiError>
where
  S: AttendanceStore,
{
  let record = store
    .get_record(id)
    .await?
    .ok_or(CoreError::RecordNotFound(id))?;
  Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub schedule_id: Uuid,
}

/// `GET /attendance?schedule_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(store.records_for_schedule(params.schedule_id).await?))
}

/// `GET /attendance/pending` — the HOD's verification queue, oldest first.
pub async fn pending<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Hod)?;
  let department_id = caller.department()?;
  Ok(Json(store.pending_for_department(department_id).await?))
}

// ─── Excuse ───────────────────────────────────────────────────────────────────

/// `POST /attendance/{id}/excuse` — body: [`NewExcuse`].
///
/// Only the lecturer of the class may attach; the document itself is
/// already stored elsewhere and arrives as an opaque reference.
pub async fn excuse<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<NewExcuse>,
) -> Result<Json<AttendanceRecord>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Lecturer)?;
  let entry = entry_of_record(&*store, id).await?;
  if entry.lecturer_id != caller.user_id {
    return Err(CoreError::Forbidden("record belongs to another lecturer's class").into());
  }
  Ok(Json(store.attach_excuse(id, body, Utc::now()).await?))
}

// ─── Verify ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  pub decision: Decision,
}

/// `POST /attendance/{id}/verify` — terminal; a second call fails 409.
pub async fn verify<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(body): Json<VerifyBody>,
) -> Result<Json<AttendanceRecord>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Hod)?;
  let entry = entry_of_record(&*store, id).await?;
  caller.require_department(entry.department_id)?;
  Ok(Json(store.finalize(id, body.decision).await?))
}

/// Resolve the schedule entry a record was taken against, for scope checks.
async fn entry_of_record<S>(store: &S, record_id: Uuid) -> Result<ScheduleEntry, ApiError>
where
  S: AttendanceStore,
{
  let record = store
    .get_record(record_id)
    .await?
    .ok_or(CoreError::RecordNotFound(record_id))?;
  let entry = store
    .get_entry(record.schedule_id)
    .await?
    .ok_or(CoreError::ScheduleEntryNotFound(record.schedule_id))?;
  Ok(entry)
}
