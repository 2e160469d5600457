//! Handlers for `/schedules` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/schedules?department_id&day` | Live entries of a department |
//! | `GET`  | `/schedules/today` | CR; own department's classes today, with submitted flag |
//! | `GET`  | `/schedules/mine` | Lecturer; own live entries |
//! | `POST` | `/schedules` | HOD, own department; body: [`NewScheduleEntry`] |
//! | `DELETE` | `/schedules/{id}` | HOD, own department |

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_core::{
  identity::Role,
  schedule::{DayOfWeek, NewScheduleEntry, ScheduleEntry},
  store::AttendanceStore,
  Error as CoreError,
};

use crate::{error::ApiError, identity::Caller};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub department_id: Uuid,
  pub day:           DayOfWeek,
}

/// `GET /schedules?department_id=<id>&day=<weekday>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError>
where
  S: AttendanceStore,
{
  let entries = store
    .live_entries_for(params.department_id, params.day)
    .await?;
  Ok(Json(entries))
}

// ─── Today ────────────────────────────────────────────────────────────────────

/// One class on today's schedule, with whether attendance has been submitted.
#[derive(Debug, Serialize)]
pub struct TodayClass {
  #[serde(flatten)]
  pub entry:     ScheduleEntry,
  pub submitted: bool,
}

/// `GET /schedules/today` — the CR's worklist for the current server day.
pub async fn today<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<TodayClass>>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Cr)?;
  let department_id = caller.department()?;

  let now = Utc::now();
  let day = DayOfWeek::from(now.weekday());
  let date = now.date_naive();

  let entries = store.live_entries_for(department_id, day).await?;

  let mut classes = Vec::with_capacity(entries.len());
  for entry in entries {
    let submitted = store.record_for(entry.schedule_id, date).await?.is_some();
    classes.push(TodayClass { entry, submitted });
  }
  Ok(Json(classes))
}

// ─── Mine ─────────────────────────────────────────────────────────────────────

/// `GET /schedules/mine` — a lecturer's own live entries.
pub async fn mine<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Lecturer)?;
  Ok(Json(store.entries_for_lecturer(caller.user_id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /schedules` — HOD, scoped to their own department.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewScheduleEntry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Hod)?;
  caller.require_department(body.department_id)?;
  let entry = store.add_entry(body).await?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /schedules/{id}` — HOD; refused for other departments' entries.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Hod)?;
  let entry = store
    .get_entry(id)
    .await?
    .ok_or(CoreError::ScheduleEntryNotFound(id))?;
  caller.require_department(entry.department_id)?;
  store.remove_entry(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
