//! Handlers for `/semesters` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/semesters` | All semesters, newest first |
//! | `POST` | `/semesters` | Admin; body: [`NewSemester`] |
//! | `GET`  | `/semesters/active` | The active semester or `null` |
//! | `POST` | `/semesters/{id}/activate` | Admin; atomic exclusivity swap |
//! | `POST` | `/semesters/deactivate` | Admin; idempotent |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use uuid::Uuid;

use rollcall_core::{
  identity::Role,
  semester::{NewSemester, Semester},
  store::AttendanceStore,
};

use crate::{error::ApiError, identity::Caller};

/// `GET /semesters`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
) -> Result<Json<Vec<Semester>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(store.list_semesters().await?))
}

/// `POST /semesters` — Admin only.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewSemester>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Admin)?;
  let semester = store.add_semester(body).await?;
  Ok((StatusCode::CREATED, Json(semester)))
}

/// `GET /semesters/active`
pub async fn active<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
) -> Result<Json<Option<Semester>>, ApiError>
where
  S: AttendanceStore,
{
  Ok(Json(store.current_semester().await?))
}

/// `POST /semesters/{id}/activate` — Admin only.
pub async fn activate<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Semester>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Admin)?;
  Ok(Json(store.activate_semester(id).await?))
}

/// `POST /semesters/deactivate` — Admin only; a no-op when none is active.
pub async fn deactivate<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Option<Semester>>, ApiError>
where
  S: AttendanceStore,
{
  caller.require(Role::Admin)?;
  Ok(Json(store.deactivate_semester().await?))
}
