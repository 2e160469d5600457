//! Identity extractor — turns trusted upstream headers into a [`Caller`].
//!
//! The engine does not issue or verify tokens; the deployment fronts it
//! with an identity provider that asserts the caller via three headers:
//!
//! - `x-user-id`: UUID of the caller
//! - `x-user-role`: one of `cr`, `lecturer`, `hod`, `admin`
//! - `x-department-id`: UUID scope, required for all roles except admin
//!
//! There is no ambient session anywhere downstream of this extractor; the
//! identity travels as an explicit value into every gated operation.

use axum::{
  extract::FromRequestParts,
  http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use rollcall_core::identity::{Identity, Role};

use crate::error::ApiError;

/// The authenticated caller, newtyped so it can act as an axum extractor.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Identity);

impl std::ops::Deref for Caller {
  type Target = Identity;

  fn deref(&self) -> &Identity { &self.0 }
}

/// Parse the identity headers; used directly by tests and the extractor.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, ApiError> {
  let user_id = header_uuid(headers, "x-user-id")?
    .ok_or_else(|| ApiError::Unauthorized("missing x-user-id header".into()))?;

  let role: Role = headers
    .get("x-user-role")
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::Unauthorized("missing x-user-role header".into()))?
    .parse()
    .map_err(|_| ApiError::Unauthorized("unknown x-user-role value".into()))?;

  let department_id = header_uuid(headers, "x-department-id")?;
  if department_id.is_none() && role != Role::Admin {
    return Err(ApiError::Unauthorized(format!(
      "role {} requires a department scope",
      role.as_str()
    )));
  }

  Ok(Identity { user_id, role, department_id })
}

fn header_uuid(headers: &HeaderMap, name: &str) -> Result<Option<Uuid>, ApiError> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(|s| {
      Uuid::parse_str(s)
        .map_err(|_| ApiError::Unauthorized(format!("malformed {name} header")))
    })
    .transpose()
}

impl<S> FromRequestParts<S> for Caller
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    identity_from_headers(&parts.headers).map(Caller)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(entries: &[(&str, String)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in entries {
      map.insert(
        axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
        HeaderValue::from_str(value).unwrap(),
      );
    }
    map
  }

  #[test]
  fn full_identity_parses() {
    let user = Uuid::new_v4();
    let dept = Uuid::new_v4();
    let id = identity_from_headers(&headers(&[
      ("x-user-id", user.to_string()),
      ("x-user-role", "hod".to_string()),
      ("x-department-id", dept.to_string()),
    ]))
    .unwrap();
    assert_eq!(id.user_id, user);
    assert_eq!(id.role, Role::Hod);
    assert_eq!(id.department_id, Some(dept));
  }

  #[test]
  fn admin_needs_no_department() {
    let id = identity_from_headers(&headers(&[
      ("x-user-id", Uuid::new_v4().to_string()),
      ("x-user-role", "admin".to_string()),
    ]))
    .unwrap();
    assert_eq!(id.role, Role::Admin);
    assert!(id.department_id.is_none());
  }

  #[test]
  fn cr_without_department_is_rejected() {
    let err = identity_from_headers(&headers(&[
      ("x-user-id", Uuid::new_v4().to_string()),
      ("x-user-role", "cr".to_string()),
    ]))
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn missing_user_id_is_rejected() {
    let err = identity_from_headers(&headers(&[
      ("x-user-role", "admin".to_string()),
    ]))
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn unknown_role_is_rejected() {
    let err = identity_from_headers(&headers(&[
      ("x-user-id", Uuid::new_v4().to_string()),
      ("x-user-role", "registrar".to_string()),
    ]))
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn malformed_uuid_is_rejected() {
    let err = identity_from_headers(&headers(&[
      ("x-user-id", "not-a-uuid".to_string()),
      ("x-user-role", "admin".to_string()),
    ]))
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }
}
