//! Caller identity — who is asking, in what role, for which department.
//!
//! The engine trusts the upstream identity provider: every gated operation
//! receives an [`Identity`] as an explicit argument. There is no ambient
//! session state anywhere in the core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The closed set of roles the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// Class representative — records daily attendance.
  Cr,
  /// Lecturer — attaches excuses to their own absences.
  Lecturer,
  /// Head of department — verifies records and manages the timetable.
  Hod,
  /// Administrator — manages semesters and reads reports.
  Admin,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Cr => "cr",
      Self::Lecturer => "lecturer",
      Self::Hod => "hod",
      Self::Admin => "admin",
    }
  }
}

impl std::str::FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "cr" => Ok(Self::Cr),
      "lecturer" => Ok(Self::Lecturer),
      "hod" => Ok(Self::Hod),
      "admin" => Ok(Self::Admin),
      other => Err(Error::Validation(format!("unknown role: {other:?}"))),
    }
  }
}

/// A verified caller, as asserted by the upstream identity provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Identity {
  pub user_id:       Uuid,
  pub role:          Role,
  /// Department scope; present for CR, Lecturer and HOD identities.
  pub department_id: Option<Uuid>,
}

impl Identity {
  /// Precondition: the caller holds `role`.
  pub fn require(&self, role: Role) -> Result<()> {
    if self.role == role {
      Ok(())
    } else {
      Err(Error::Forbidden("caller does not hold the required role"))
    }
  }

  /// Precondition: the caller holds one of `roles`.
  pub fn require_one_of(&self, roles: &[Role]) -> Result<()> {
    if roles.contains(&self.role) {
      Ok(())
    } else {
      Err(Error::Forbidden("caller does not hold a permitted role"))
    }
  }

  /// Precondition: the caller is scoped to `department_id`.
  pub fn require_department(&self, department_id: Uuid) -> Result<()> {
    if self.department_id == Some(department_id) {
      Ok(())
    } else {
      Err(Error::Forbidden("caller is scoped to a different department"))
    }
  }

  /// The caller's department, or `Validation` if the identity carries none.
  pub fn department(&self) -> Result<Uuid> {
    self
      .department_id
      .ok_or_else(|| Error::Validation("identity has no department scope".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn identity(role: Role, department_id: Option<Uuid>) -> Identity {
    Identity { user_id: Uuid::new_v4(), role, department_id }
  }

  #[test]
  fn require_matches_exact_role() {
    let id = identity(Role::Cr, None);
    assert!(id.require(Role::Cr).is_ok());
    assert!(matches!(id.require(Role::Hod), Err(Error::Forbidden(_))));
  }

  #[test]
  fn require_one_of_accepts_any_listed_role() {
    let id = identity(Role::Hod, None);
    assert!(id.require_one_of(&[Role::Admin, Role::Hod]).is_ok());
    assert!(
      matches!(id.require_one_of(&[Role::Cr]), Err(Error::Forbidden(_)))
    );
  }

  #[test]
  fn department_scope_must_match() {
    let dept = Uuid::new_v4();
    let id = identity(Role::Hod, Some(dept));
    assert!(id.require_department(dept).is_ok());
    assert!(matches!(
      id.require_department(Uuid::new_v4()),
      Err(Error::Forbidden(_))
    ));
  }

  #[test]
  fn role_round_trips_through_str() {
    for role in [Role::Cr, Role::Lecturer, Role::Hod, Role::Admin] {
      assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
    assert!("provost".parse::<Role>().is_err());
  }
}
