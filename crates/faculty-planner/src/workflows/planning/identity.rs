use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::UserId;

/// Role name granting full visibility and plan annotation rights.
pub const DEAN_ROLE: &str = "dean";

/// Header scheme the HTTP client sends: `Authorization: Token <opaque>`.
pub const TOKEN_SCHEME: &str = "Token";

/// A caller whose identity and role names were resolved before any planning
/// operation runs. Role checks test the loaded set directly; nothing here
/// reaches back into the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub national_id: String,
    pub school: String,
    pub contract_type: String,
    pub roles: BTreeSet<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_dean(&self) -> bool {
        self.has_role(DEAN_ROLE)
    }

    pub fn profile(&self) -> ProfileView {
        ProfileView {
            username: self.username.clone(),
            email: self.email.clone(),
            national_id: self.national_id.clone(),
            school: self.school.clone(),
            contract_type: self.contract_type.clone(),
            roles: self.roles.iter().cloned().collect(),
        }
    }
}

/// Identity payload returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub national_id: String,
    pub school: String,
    pub contract_type: String,
    pub roles: Vec<String>,
}

/// What a caller is allowed to see of owner-scoped records.
///
/// Deans see everything; everyone else sees records they own. Resources reached
/// through a foreign key (plan details) inherit the owning plan's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Everything,
    OwnedBy(UserId),
}

impl Visibility {
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        if user.is_dean() {
            Visibility::Everything
        } else {
            Visibility::OwnedBy(user.id)
        }
    }

    pub fn allows(&self, owner: UserId) -> bool {
        match self {
            Visibility::Everything => true,
            Visibility::OwnedBy(user) => *user == owner,
        }
    }
}

/// Lookup seam between the HTTP layer and whatever manages accounts and tokens.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<AuthenticatedUser>;
}
