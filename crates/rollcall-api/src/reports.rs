//! Handler for the reporting read API.
//!
//! The engine only hands out aggregate figures; the reporting component
//! renders them into whatever document format it likes.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use rollcall_core::{
  identity::Role, report::AttendanceSummary, store::AttendanceStore,
};

use crate::{error::ApiError, identity::Caller};

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
  pub department_id: Uuid,
  pub from:          NaiveDate,
  pub to:            NaiveDate,
}

/// `GET /reports/summary?department_id=<id>&from=<date>&to=<date>`
///
/// Admins may query any department; a HOD only their own.
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Query(params): Query<SummaryParams>,
) -> Result<Json<AttendanceSummary>, ApiError>
where
  S: AttendanceStore,
{
  caller.require_one_of(&[Role::Admin, Role::Hod])?;
  if caller.role == Role::Hod {
    caller.require_department(params.department_id)?;
  }
  let summary = store
    .attendance_summary(params.department_id, params.from, params.to)
    .await?;
  Ok(Json(summary))
}
