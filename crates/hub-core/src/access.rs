//! Visibility rules for search results.
//!
//! A caller sees content whose visibility level is in their
//! [`VisibilityScope`], plus everything they own regardless of level:
//!
//! | Caller | Scope |
//! |--------|-------|
//! | anonymous | `public` |
//! | authenticated | `public`, `aws_community` |
//! | privileged | `public`, `aws_community`, `aws_only` |
//!
//! The same rule is rendered as SQL by the database layer. The in-process
//! form here is used to re-check rows after a query returns.

use uuid::Uuid;

use crate::models::Visibility;

/// Identity of the caller, already normalised by the authentication boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    /// Caller's user id, when it could be resolved.
    pub user_id: Option<Uuid>,
    pub authenticated: bool,
    /// Privileged employee. Expected to imply `authenticated`; not enforced.
    pub privileged: bool,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            authenticated: true,
            privileged: false,
        }
    }

    pub fn privileged(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            authenticated: true,
            privileged: true,
        }
    }
}

/// Ordered set of visibility levels a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityScope {
    levels: Vec<Visibility>,
}

impl VisibilityScope {
    /// Derive the scope for a caller.
    pub fn for_caller(caller: &Caller) -> Self {
        let mut levels = vec![Visibility::Public];
        if caller.authenticated {
            levels.push(Visibility::AwsCommunity);
        }
        if caller.privileged {
            levels.push(Visibility::AwsOnly);
        }
        Self { levels }
    }

    pub fn levels(&self) -> &[Visibility] {
        &self.levels
    }

    pub fn contains(&self, visibility: Visibility) -> bool {
        self.levels.contains(&visibility)
    }

    pub fn is_superset_of(&self, other: &VisibilityScope) -> bool {
        other.levels.iter().all(|v| self.contains(*v))
    }

    /// Level names for binding as a `text[]` parameter.
    pub fn to_db_values(&self) -> Vec<String> {
        self.levels.iter().map(|v| v.as_str().to_string()).collect()
    }

    /// Row-level decision: in scope, or owned by the caller.
    pub fn permits(&self, visibility: Visibility, owner_id: Uuid, caller_id: Option<Uuid>) -> bool {
        self.contains(visibility) || caller_id == Some(owner_id)
    }
}
