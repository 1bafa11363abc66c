//! User entity and roles.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Platform role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
    Editor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Role::Client),
            "admin" => Some(Role::Admin),
            "editor" => Some(Role::Editor),
            _ => None,
        }
    }
}

/// Profile fields editable by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Platform user.
///
/// `stripe_customer_id` is the lazily-created Customer Reference: populated
/// on the user's first authenticated charge, never cleared, at most one per
/// user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub is_super_admin: bool,
    pub profile: Profile,
    pub stripe_customer_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Creates a new client user.
    pub fn new(id: UserId, email: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id,
            email: email.into(),
            role: Role::Client,
            is_super_admin: false,
            profile: Profile::default(),
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user may view ledger-adjacent admin surfaces.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_super_admin
    }
}
