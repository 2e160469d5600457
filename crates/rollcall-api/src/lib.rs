//! JSON REST API for the Rollcall attendance engine.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollcall_core::store::AttendanceStore`]. Identity arrives as trusted
//! headers from the upstream provider (see [`identity`]); TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollcall_api::api_router(store.clone()))
//! ```

pub mod attendance;
pub mod error;
pub mod identity;
pub mod reports;
pub mod schedules;
pub mod semesters;

use std::sync::Arc;

use axum::{
  routing::{delete, get, post},
  Router,
};
use rollcall_core::store::AttendanceStore;

pub use error::ApiError;
pub use identity::Caller;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Semester registry
    .route("/semesters", get(semesters::list::<S>).post(semesters::create::<S>))
    .route("/semesters/active", get(semesters::active::<S>))
    .route("/semesters/deactivate", post(semesters::deactivate::<S>))
    .route("/semesters/{id}/activate", post(semesters::activate::<S>))
    // Schedule catalog
    .route("/schedules", get(schedules::list::<S>).post(schedules::create::<S>))
    .route("/schedules/today", get(schedules::today::<S>))
    .route("/schedules/mine", get(schedules::mine::<S>))
    .route("/schedules/{id}", delete(schedules::delete::<S>))
    // Attendance ledger, excuses, verification
    .route("/attendance", get(attendance::list::<S>).post(attendance::create::<S>))
    .route("/attendance/pending", get(attendance::pending::<S>))
    .route("/attendance/{id}", get(attendance::get_one::<S>))
    .route("/attendance/{id}/excuse", post(attendance::excuse::<S>))
    .route("/attendance/{id}/verify", post(attendance::verify::<S>))
    // Reporting reads
    .route("/reports/summary", get(reports::summary::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
  };
  use chrono::{Datelike, Utc};
  use rollcall_core::identity::Role;
  use rollcall_store_sqlite::SqliteStore;
  use serde_json::{json, Value};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn router() -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  struct Actor {
    user_id:       Uuid,
    role:          Role,
    department_id: Option<Uuid>,
  }

  fn admin() -> Actor {
    Actor {
      user_id:       Uuid::new_v4(),
      role:          Role::Admin,
      department_id: None,
    }
  }

  fn scoped(role: Role, department_id: Uuid) -> Actor {
    Actor {
      user_id:       Uuid::new_v4(),
      role,
      department_id: Some(department_id),
    }
  }

  async fn call(
    app: &Router<()>,
    method: &str,
    uri: &str,
    actor: Option<&Actor>,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
      builder = builder
        .header("x-user-id", actor.user_id.to_string())
        .header("x-user-role", actor.role.as_str());
      if let Some(dept) = actor.department_id {
        builder = builder.header("x-department-id", dept.to_string());
      }
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn semester_body() -> Value {
    json!({
      "year": 2024,
      "term": "first",
      "start_date": "2024-02-01",
      "end_date": "2024-06-30",
    })
  }

  fn schedule_body(department_id: Uuid, lecturer_id: Uuid, day: &str) -> Value {
    json!({
      "subject": { "subject_id": Uuid::new_v4(), "department_id": department_id },
      "lecturer": { "lecturer_id": lecturer_id, "department_id": department_id },
      "department_id": department_id,
      "day": day,
      "start_time": "09:00:00",
      "end_time": "10:00:00",
    })
  }

  /// Create and activate a semester, returning its id.
  async fn activated_semester(app: &Router<()>, admin: &Actor) -> String {
    let resp = call(app, "POST", "/semesters", Some(admin), Some(semester_body())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["semester_id"].as_str().unwrap().to_string();

    let resp = call(
      app,
      "POST",
      &format!("/semesters/{id}/activate"),
      Some(admin),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    id
  }

  // ── Identity and role gates ─────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_identity_headers_return_401() {
    let app = router().await;
    let resp = call(&app, "GET", "/semesters", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn non_admin_cannot_create_semesters() {
    let app = router().await;
    let cr = scoped(Role::Cr, Uuid::new_v4());
    let resp = call(&app, "POST", "/semesters", Some(&cr), Some(semester_body())).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn hod_cannot_schedule_for_another_department() {
    let app = router().await;
    let adm = admin();
    activated_semester(&app, &adm).await;

    let hod = scoped(Role::Hod, Uuid::new_v4());
    let other_dept = Uuid::new_v4();
    let resp = call(
      &app,
      "POST",
      "/schedules",
      Some(&hod),
      Some(schedule_body(other_dept, Uuid::new_v4(), "monday")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  // ── Semesters over HTTP ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn activate_unknown_semester_returns_404() {
    let app = router().await;
    let adm = admin();
    let resp = call(
      &app,
      "POST",
      &format!("/semesters/{}/activate", Uuid::new_v4()),
      Some(&adm),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn active_semester_round_trip() {
    let app = router().await;
    let adm = admin();

    let resp = call(&app, "GET", "/semesters/active", Some(&adm), None).await;
    assert_eq!(body_json(resp).await, Value::Null);

    let id = activated_semester(&app, &adm).await;
    let resp = call(&app, "GET", "/semesters/active", Some(&adm), None).await;
    assert_eq!(body_json(resp).await["semester_id"].as_str().unwrap(), id);

    let resp = call(&app, "POST", "/semesters/deactivate", Some(&adm), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = call(&app, "GET", "/semesters/active", Some(&adm), None).await;
    assert_eq!(body_json(resp).await, Value::Null);
  }

  // ── Full lifecycle over HTTP ────────────────────────────────────────────────

  #[tokio::test]
  async fn attendance_lifecycle_over_http() {
    let app = router().await;
    let adm = admin();
    let dept = Uuid::new_v4();
    let hod = scoped(Role::Hod, dept);
    let cr = scoped(Role::Cr, dept);

    activated_semester(&app, &adm).await;

    // HOD puts today's class on the timetable so the CR worklist shows it.
    let weekday = match Utc::now().weekday() {
      chrono::Weekday::Mon => "monday",
      chrono::Weekday::Tue => "tuesday",
      chrono::Weekday::Wed => "wednesday",
      chrono::Weekday::Thu => "thursday",
      chrono::Weekday::Fri => "friday",
      chrono::Weekday::Sat => "saturday",
      chrono::Weekday::Sun => "sunday",
    };
    let lecturer = scoped(Role::Lecturer, dept);
    let resp = call(
      &app,
      "POST",
      "/schedules",
      Some(&hod),
      Some(schedule_body(dept, lecturer.user_id, weekday)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let schedule_id = body_json(resp).await["schedule_id"].as_str().unwrap().to_string();

    let resp = call(&app, "GET", "/schedules/today", Some(&cr), None).await;
    let worklist = body_json(resp).await;
    assert_eq!(worklist[0]["schedule_id"].as_str().unwrap(), schedule_id);
    assert_eq!(worklist[0]["submitted"], Value::Bool(false));

    // CR records an absence; the second submission loses with 409.
    let record_body = json!({ "schedule_id": schedule_id, "present": false });
    let resp = call(&app, "POST", "/attendance", Some(&cr), Some(record_body.clone())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let record_id = body_json(resp).await["record_id"].as_str().unwrap().to_string();

    let resp = call(&app, "POST", "/attendance", Some(&cr), Some(record_body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = call(&app, "GET", "/schedules/today", Some(&cr), None).await;
    assert_eq!(body_json(resp).await[0]["submitted"], Value::Bool(true));

    // The record sits in the HOD's queue.
    let resp = call(&app, "GET", "/attendance/pending", Some(&hod), None).await;
    assert_eq!(body_json(resp).await[0]["record_id"].as_str().unwrap(), record_id);

    // Only the owning lecturer may excuse their absence.
    let excuse_body = json!({ "document_ref": "doc-med-7", "comment": "flu" });
    let other = scoped(Role::Lecturer, dept);
    let resp = call(
      &app,
      "POST",
      &format!("/attendance/{record_id}/excuse"),
      Some(&other),
      Some(excuse_body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call(
      &app,
      "POST",
      &format!("/attendance/{record_id}/excuse"),
      Some(&lecturer),
      Some(excuse_body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let excused = body_json(resp).await;
    assert_eq!(excused["excuse"]["document_ref"].as_str().unwrap(), "doc-med-7");
    assert_eq!(excused["status"].as_str().unwrap(), "pending");

    // HOD verifies; the gate refuses a second decision.
    let verify_body = json!({ "decision": "verified" });
    let resp = call(
      &app,
      "POST",
      &format!("/attendance/{record_id}/verify"),
      Some(&hod),
      Some(verify_body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"].as_str().unwrap(), "verified");

    let resp = call(
      &app,
      "POST",
      &format!("/attendance/{record_id}/verify"),
      Some(&hod),
      Some(verify_body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Today's aggregates: one class, nobody present, one verified.
    let today = Utc::now().date_naive();
    let resp = call(
      &app,
      "GET",
      &format!("/reports/summary?department_id={dept}&from={today}&to={today}"),
      Some(&hod),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary = body_json(resp).await;
    assert_eq!(summary["total_recorded"], json!(1));
    assert_eq!(summary["total_present"], json!(0));
    assert_eq!(summary["total_verified"], json!(1));
  }

  #[tokio::test]
  async fn hod_cannot_read_other_departments_summary() {
    let app = router().await;
    let hod = scoped(Role::Hod, Uuid::new_v4());
    let today = Utc::now().date_naive();
    let resp = call(
      &app,
      "GET",
      &format!(
        "/reports/summary?department_id={}&from={today}&to={today}",
        Uuid::new_v4()
      ),
      Some(&hod),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }
}
