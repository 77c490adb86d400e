//! Authorization policy
//!
//! A pure policy function decides whether a session may perform a
//! mutation on a post, decoupled from HTTP verbs and unit-testable
//! without a transport. Reads never enter the policy; they are public.
//!
//! Resource existence is not this module's concern: callers look the
//! resource up first (unknown IDs are a 404, not a 403) and then apply
//! the policy to the owner they found.

use crate::error::AppError;

/// Mutation kind being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated session
    Unauthenticated,
    /// Session user is not the resource owner
    NotOwner,
}

/// Policy outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Decide whether `session_user` may perform `op` on a resource owned
/// by `resource_owner`
///
/// Rules:
/// - no session user: denied, whatever the operation
/// - create: allowed for any authenticated user (ownership is assigned
///   from the session at creation, never checked against a resource)
/// - update/delete: session user must equal the resource owner
pub fn authorize(
    op: Operation,
    session_user: Option<&str>,
    resource_owner: Option<&str>,
) -> Decision {
    let Some(user) = session_user else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    match op {
        Operation::Create => Decision::Allow,
        Operation::Update | Operation::Delete => match resource_owner {
            Some(owner) if owner == user => Decision::Allow,
            _ => Decision::Deny(DenyReason::NotOwner),
        },
    }
}

impl Decision {
    /// Map a denial to its HTTP-facing error; `Allow` passes through
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(AppError::Unauthorized),
            Decision::Deny(DenyReason::NotOwner) => Err(AppError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_session_is_denied_for_every_operation() {
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize(op, None, Some("alice")),
                Decision::Deny(DenyReason::Unauthenticated)
            );
        }
    }

    #[test]
    fn any_authenticated_user_may_create() {
        assert_eq!(authorize(Operation::Create, Some("alice"), None), Decision::Allow);
    }

    #[test]
    fn owner_may_update_and_delete() {
        assert_eq!(
            authorize(Operation::Update, Some("alice"), Some("alice")),
            Decision::Allow
        );
        assert_eq!(
            authorize(Operation::Delete, Some("alice"), Some("alice")),
            Decision::Allow
        );
    }

    #[test]
    fn non_owner_mutations_are_denied() {
        assert_eq!(
            authorize(Operation::Update, Some("bob"), Some("alice")),
            Decision::Deny(DenyReason::NotOwner)
        );
        // Delete is guarded exactly like update
        assert_eq!(
            authorize(Operation::Delete, Some("bob"), Some("alice")),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn mutations_without_a_known_owner_are_denied() {
        assert_eq!(
            authorize(Operation::Update, Some("alice"), None),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn denials_map_to_http_errors() {
        assert!(matches!(
            authorize(Operation::Delete, None, Some("alice")).require(),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize(Operation::Delete, Some("bob"), Some("alice")).require(),
            Err(AppError::Forbidden)
        ));
        assert!(authorize(Operation::Create, Some("bob"), None)
            .require()
            .is_ok());
    }
}
