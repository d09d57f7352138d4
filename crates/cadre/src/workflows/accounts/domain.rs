use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for portal users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Role tags granted to a portal account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Governor,
    GeneralAdmin,
    CentralAdmin,
    GeneralDepartmentMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Governor => "governor",
            Role::GeneralAdmin => "general_admin",
            Role::CentralAdmin => "central_admin",
            Role::GeneralDepartmentMember => "general_department_member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_matches('"') {
            "user" => Some(Role::User),
            "governor" => Some(Role::Governor),
            "general_admin" => Some(Role::GeneralAdmin),
            "central_admin" => Some(Role::CentralAdmin),
            "general_department_member" => Some(Role::GeneralDepartmentMember),
            _ => None,
        }
    }
}

/// Roles allowed to review and activate pending accounts.
pub const ACCOUNT_APPROVERS: [Role; 2] = [Role::Governor, Role::GeneralAdmin];

/// Roles allowed to act on any service request.
pub const REQUEST_ADMINISTRATORS: [Role; 3] =
    [Role::Governor, Role::GeneralAdmin, Role::CentralAdmin];

/// Encode roles for the `roles` column as a JSON array of tags.
pub fn encode_roles(roles: &[Role]) -> String {
    serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the `roles` column.
///
/// Accepts JSON arrays (`["user"]`), a single JSON string (`"governor"`) and bare
/// comma-separated tags. Unknown tags are dropped.
pub fn decode_roles(raw: &str) -> Vec<Role> {
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(raw) {
        return tags.iter().filter_map(|tag| Role::parse(tag)).collect();
    }
    if let Ok(tag) = serde_json::from_str::<String>(raw) {
        return Role::parse(&tag).into_iter().collect();
    }
    raw.split(',').filter_map(Role::parse).collect()
}

/// Stored portal account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub governorate: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
            governorate: self.governorate.clone(),
            active: self.active,
            created_at: self.created_at,
        }
    }
}

/// Insert payload for a new account; the id and timestamp are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub governorate: String,
    pub active: bool,
}

/// Account representation safe to return from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub governorate: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration form as posted by the sign-up page.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    #[serde(rename = "confirm-password")]
    pub confirm_password: String,
    pub email: String,
    pub governorate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}
