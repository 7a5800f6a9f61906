//! Authorization decision layer.
//!
//! Every role/ownership rule in the API lives here as a pure function over
//! the resolved caller (and optionally a target admin). Handlers ask for a
//! decision first and only then touch the store, applying the returned
//! [`Scope`] to their queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Administrator role, the ceiling of permitted actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Operator,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            "guest" => Ok(Role::Guest),
            other => Err(format!("unknown admin role: {}", other)),
        }
    }
}

/// Resolved identity of the requesting admin, loaded fresh from the store
/// on every request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub company_id: Option<i64>,
}

/// Role and company of the admin named by a path parameter, for admin
/// delete/manage routes.
#[derive(Debug, Clone)]
pub struct TargetAdmin {
    pub id: i64,
    pub role: Role,
    pub company_id: Option<i64>,
}

/// Company restriction a query must apply for a given caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// No restriction (superadmin).
    All,
    /// Restrict to this company.
    Company(i64),
}

/// Denial reasons, mapped onto the HTTP error taxonomy by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Forbidden(String),
    /// Superadmin request that must name a company but did not.
    MissingCompany,
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Forbidden(msg) => ApiError::forbidden(msg),
            Denial::MissingCompany => {
                ApiError::bad_request("Company ID is required for superadmin")
            }
        }
    }
}

/// Roles an `admin` caller may assign to or remove from other admins.
pub const ADMIN_ASSIGNABLE_ROLES: [Role; 3] = [Role::Admin, Role::Operator, Role::Guest];

fn caller_company(caller: &Caller) -> Result<i64, Denial> {
    caller.company_id.ok_or_else(|| {
        Denial::Forbidden("Company information not found for the logged-in admin".to_string())
    })
}

/// Scope for list/read queries. Superadmin sees every company; everyone
/// else is pinned to their own.
pub fn read_scope(caller: &Caller) -> Result<Scope, Denial> {
    match caller.role {
        Role::Superadmin => Ok(Scope::All),
        _ => Ok(Scope::Company(caller_company(caller)?)),
    }
}

/// Resolve the company a create operation acts on. For admin and operator
/// callers any company supplied in the request is silently overridden by
/// their own; superadmins must name one explicitly.
pub fn create_company(caller: &Caller, requested: Option<i64>) -> Result<i64, Denial> {
    match caller.role {
        Role::Superadmin => requested.ok_or(Denial::MissingCompany),
        Role::Admin | Role::Operator => caller_company(caller),
        Role::Guest => Err(Denial::Forbidden("Unauthorized".to_string())),
    }
}

/// Verify/delete on a domain: superadmin touches any company's domains,
/// admin and operator only their own.
pub fn check_domain_mutation(
    caller: &Caller,
    domain_company_id: i64,
    action: &str,
) -> Result<(), Denial> {
    match caller.role {
        Role::Superadmin => Ok(()),
        Role::Admin | Role::Operator => {
            if caller_company(caller)? == domain_company_id {
                Ok(())
            } else {
                Err(Denial::Forbidden(format!("Unauthorized to {} this domain", action)))
            }
        }
        Role::Guest => Err(Denial::Forbidden(format!("Unauthorized to {} this domain", action))),
    }
}

/// Ownership gate for mail-account operations: the owning domain's company
/// must match the caller's, superadmin excepted. Applied even when the
/// request never names the domain directly.
pub fn check_mail_domain_ownership(caller: &Caller, domain_company_id: i64) -> Result<(), Denial> {
    match caller.role {
        Role::Superadmin => Ok(()),
        _ => {
            if caller_company(caller)? == domain_company_id {
                Ok(())
            } else {
                Err(Denial::Forbidden("Domain not owned by your company".to_string()))
            }
        }
    }
}

/// An admin may never delete or edit their own record through the
/// admin-management endpoints, superadmin included.
pub fn check_self_modification(caller: &Caller, target_id: i64) -> Result<(), Denial> {
    if caller.id == target_id {
        Err(Denial::Forbidden("Modifying own admin account is not allowed".to_string()))
    } else {
        Ok(())
    }
}

/// Creating an admin: superadmin may create any role in any company (the
/// company must be named); admin may only create the assignable roles
/// within their own company.
pub fn check_admin_create(
    caller: &Caller,
    requested_company: Option<i64>,
    new_role: Role,
) -> Result<i64, Denial> {
    match caller.role {
        Role::Superadmin => requested_company.ok_or(Denial::MissingCompany),
        Role::Admin => {
            if !ADMIN_ASSIGNABLE_ROLES.contains(&new_role) {
                return Err(Denial::Forbidden(format!(
                    "Unauthorized - Admin can only set types to {}",
                    assignable_roles_list()
                )));
            }
            caller_company(caller)
        }
        Role::Operator | Role::Guest => Err(Denial::Forbidden("Unauthorized".to_string())),
    }
}

/// Deleting an admin: superadmin may delete anyone; admin only the
/// assignable roles within their own company.
pub fn check_admin_delete(caller: &Caller, target: &TargetAdmin) -> Result<(), Denial> {
    match caller.role {
        Role::Superadmin => Ok(()),
        Role::Admin => {
            if !ADMIN_ASSIGNABLE_ROLES.contains(&target.role)
                || target.company_id != Some(caller_company(caller)?)
            {
                return Err(Denial::Forbidden(
                    "Unauthorized - Can only delete admin, operator, and guest within the same company"
                        .to_string(),
                ));
            }
            Ok(())
        }
        Role::Operator | Role::Guest => Err(Denial::Forbidden("Unauthorized".to_string())),
    }
}

/// Editing an admin's role/password: superadmin unrestricted; admin may
/// not touch superadmins, may not assign roles outside the allowed set,
/// and may only act within their own company.
pub fn check_admin_manage(
    caller: &Caller,
    target: &TargetAdmin,
    new_role: Role,
) -> Result<(), Denial> {
    match caller.role {
        Role::Superadmin => Ok(()),
        Role::Admin => {
            if target.role == Role::Superadmin {
                return Err(Denial::Forbidden(
                    "Unauthorized - Cannot change the type of a superadmin".to_string(),
                ));
            }
            if !ADMIN_ASSIGNABLE_ROLES.contains(&new_role) {
                return Err(Denial::Forbidden(format!(
                    "Unauthorized - Admin can only set types to {}",
                    assignable_roles_list()
                )));
            }
            if target.company_id != Some(caller_company(caller)?) {
                return Err(Denial::Forbidden(
                    "Unauthorized - Can only update admin within the same company".to_string(),
                ));
            }
            Ok(())
        }
        Role::Operator | Role::Guest => Err(Denial::Forbidden("Unauthorized".to_string())),
    }
}

fn assignable_roles_list() -> String {
    ADMIN_ASSIGNABLE_ROLES
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role, company: Option<i64>) -> Caller {
        Caller { id: 1, username: "caller".to_string(), role, company_id: company }
    }

    fn target(id: i64, role: Role, company: Option<i64>) -> TargetAdmin {
        TargetAdmin { id, role, company_id: company }
    }

    #[test]
    fn superadmin_reads_unscoped() {
        let c = caller(Role::Superadmin, None);
        assert_eq!(read_scope(&c), Ok(Scope::All));
    }

    #[test]
    fn non_superadmin_reads_are_company_scoped() {
        for role in [Role::Admin, Role::Operator, Role::Guest] {
            let c = caller(role, Some(5));
            assert_eq!(read_scope(&c), Ok(Scope::Company(5)));
        }
    }

    #[test]
    fn read_scope_fails_without_company() {
        let c = caller(Role::Admin, None);
        assert!(read_scope(&c).is_err());
    }

    #[test]
    fn create_company_forced_for_admin_and_operator() {
        for role in [Role::Admin, Role::Operator] {
            let c = caller(role, Some(5));
            // Supplied company id is overridden, not validated
            assert_eq!(create_company(&c, Some(7)), Ok(5));
            assert_eq!(create_company(&c, None), Ok(5));
        }
    }

    #[test]
    fn create_company_required_for_superadmin() {
        let c = caller(Role::Superadmin, None);
        assert_eq!(create_company(&c, Some(7)), Ok(7));
        assert_eq!(create_company(&c, None), Err(Denial::MissingCompany));
    }

    #[test]
    fn guest_cannot_create() {
        let c = caller(Role::Guest, Some(5));
        assert!(matches!(create_company(&c, None), Err(Denial::Forbidden(_))));
    }

    #[test]
    fn domain_mutation_ownership() {
        let superadmin = caller(Role::Superadmin, None);
        assert!(check_domain_mutation(&superadmin, 7, "delete").is_ok());

        for role in [Role::Admin, Role::Operator] {
            let c = caller(role, Some(5));
            assert!(check_domain_mutation(&c, 5, "verify").is_ok());
            let denied = check_domain_mutation(&c, 7, "delete").unwrap_err();
            assert_eq!(
                denied,
                Denial::Forbidden("Unauthorized to delete this domain".to_string())
            );
        }

        let guest = caller(Role::Guest, Some(5));
        assert!(check_domain_mutation(&guest, 5, "verify").is_err());
    }

    #[test]
    fn mail_ownership_superadmin_bypass() {
        let superadmin = caller(Role::Superadmin, Some(1));
        assert!(check_mail_domain_ownership(&superadmin, 7).is_ok());

        let admin = caller(Role::Admin, Some(5));
        assert!(check_mail_domain_ownership(&admin, 5).is_ok());
        assert!(check_mail_domain_ownership(&admin, 7).is_err());
    }

    #[test]
    fn self_modification_denied_for_everyone() {
        let mut c = caller(Role::Superadmin, None);
        c.id = 9;
        assert!(check_self_modification(&c, 9).is_err());
        assert!(check_self_modification(&c, 10).is_ok());
    }

    #[test]
    fn admin_create_role_ceiling() {
        let admin = caller(Role::Admin, Some(5));
        assert_eq!(check_admin_create(&admin, Some(7), Role::Guest), Ok(5));
        assert!(matches!(
            check_admin_create(&admin, None, Role::Superadmin),
            Err(Denial::Forbidden(_))
        ));

        let superadmin = caller(Role::Superadmin, None);
        assert_eq!(check_admin_create(&superadmin, Some(3), Role::Superadmin), Ok(3));
        assert_eq!(check_admin_create(&superadmin, None, Role::Admin), Err(Denial::MissingCompany));
    }

    #[test]
    fn admin_delete_restrictions() {
        let admin = caller(Role::Admin, Some(5));
        assert!(check_admin_delete(&admin, &target(2, Role::Operator, Some(5))).is_ok());
        // Other company
        assert!(check_admin_delete(&admin, &target(2, Role::Operator, Some(7))).is_err());
        // Superadmin target
        assert!(check_admin_delete(&admin, &target(2, Role::Superadmin, Some(5))).is_err());

        let superadmin = caller(Role::Superadmin, None);
        assert!(check_admin_delete(&superadmin, &target(2, Role::Superadmin, Some(7))).is_ok());

        let operator = caller(Role::Operator, Some(5));
        assert!(check_admin_delete(&operator, &target(2, Role::Guest, Some(5))).is_err());
    }

    #[test]
    fn admin_manage_restrictions() {
        let admin = caller(Role::Admin, Some(5));

        // In-company guest promoted within the allowed set
        assert!(check_admin_manage(&admin, &target(9, Role::Guest, Some(5)), Role::Operator).is_ok());

        // Role outside the allowed set
        let denied =
            check_admin_manage(&admin, &target(9, Role::Guest, Some(5)), Role::Superadmin)
                .unwrap_err();
        assert!(matches!(denied, Denial::Forbidden(_)));

        // Superadmin target is untouchable
        assert!(
            check_admin_manage(&admin, &target(9, Role::Superadmin, Some(5)), Role::Guest).is_err()
        );

        // Cross-company target
        assert!(
            check_admin_manage(&admin, &target(9, Role::Guest, Some(7)), Role::Guest).is_err()
        );

        let superadmin = caller(Role::Superadmin, None);
        assert!(
            check_admin_manage(&superadmin, &target(9, Role::Guest, Some(7)), Role::Superadmin)
                .is_ok()
        );
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Superadmin, Role::Admin, Role::Operator, Role::Guest] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }
}
