use serde::{Deserialize, Serialize};

use crate::domain::{User, UserType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

/// Success body shared by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
