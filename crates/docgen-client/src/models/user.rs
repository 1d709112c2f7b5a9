use std::fmt;

use serde::{Deserialize, Serialize};

use super::{id_string, null_default};

/// Role names known to the backend. Unrecognised names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Director,
    Sales,
    Technician,
    Accountant,
    Other(String),
}

impl Role {
    /// The privileged role; it overrides every permission check.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Director => "director",
            Role::Sales => "sales",
            Role::Technician => "technician",
            Role::Accountant => "accountant",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "director" => Role::Director,
            "sales" => Role::Sales,
            "technician" => Role::Technician,
            "accountant" => Role::Accountant,
            _ => Role::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user as returned by `/auth/login` and `/users/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
    #[serde(default, deserialize_with = "null_default")]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl User {
    /// Best available human-readable name.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().or(self.full_name.as_deref()) {
            if !name.trim().is_empty() {
                return name.to_string();
            }
        }
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(single), None) | (None, Some(single)) => single.to_string(),
            (None, None) => self.email.clone().unwrap_or_else(|| self.id.clone()),
        }
    }
}

/// Token and user, always held together.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Who is asking, for permission checks.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Anonymous,
    User { role: Role, permissions: Vec<String> },
}

impl Principal {
    pub fn from_user(user: Option<&User>) -> Self {
        match user {
            Some(user) => Principal::User {
                role: user.role.clone(),
                permissions: user.permissions.clone(),
            },
            None => Principal::Anonymous,
        }
    }

    /// Admin role grants everything; otherwise the permission must be listed.
    pub fn has_permission(&self, permission: &str) -> bool {
        match self {
            Principal::Anonymous => false,
            Principal::User { role, .. } if role.is_admin() => true,
            Principal::User { permissions, .. } => permissions.iter().any(|p| p == permission),
        }
    }

    pub fn has_role(&self, wanted: &Role) -> bool {
        match self {
            Principal::Anonymous => false,
            Principal::User { role, .. } => role == wanted,
        }
    }
}
