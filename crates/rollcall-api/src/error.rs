//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! The core taxonomy maps onto HTTP statuses without losing distinctions a
//! client needs: an expired excuse window (422) is not a missing record
//! (404), and a lost duplicate-submit race (409) is not a server fault.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

use rollcall_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The identity headers are missing or unparseable.
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Core(e) => (status_for(e), e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

fn status_for(e: &CoreError) -> StatusCode {
  match e {
    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
    CoreError::SemesterNotFound(_)
    | CoreError::ScheduleEntryNotFound(_)
    | CoreError::RecordNotFound(_) => StatusCode::NOT_FOUND,
    CoreError::Duplicate { .. }
    | CoreError::NotLive(_)
    | CoreError::AlreadyFinalized(_)
    | CoreError::Conflict(_) => StatusCode::CONFLICT,
    CoreError::NotEligible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rollcall_core::error::EligibilityFailure;
  use uuid::Uuid;

  #[test]
  fn window_expiry_and_missing_record_stay_distinguishable() {
    let expired = status_for(&CoreError::NotEligible {
      record_id: Uuid::new_v4(),
      reason:    EligibilityFailure::WindowExpired,
    });
    let missing = status_for(&CoreError::RecordNotFound(Uuid::new_v4()));
    assert_eq!(expired, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing, StatusCode::NOT_FOUND);
  }

  #[test]
  fn duplicate_maps_to_conflict() {
    let status = status_for(&CoreError::Duplicate {
      schedule_id: Uuid::new_v4(),
      class_date:  chrono::Utc::now().date_naive(),
    });
    assert_eq!(status, StatusCode::CONFLICT);
  }
}
