use serde::{Deserialize, Serialize};

use flow_auth::{Account, AccountSummary};
use flow_breakdowns::Breakdown;
use flow_core::{Entity, Owned};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login by email or by username; email wins when both are present.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct BreakdownRequest {
    pub name: String,
    pub description: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountSummary,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn profile_to_json(account: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": account.id.to_string(),
        "username": account.username,
        "email": account.email,
        "created_at": account.created_at.to_rfc3339(),
        "updated_at": account.updated_at.to_rfc3339(),
    })
}

pub fn breakdown_to_json(b: &Breakdown) -> serde_json::Value {
    serde_json::json!({
        "id": b.id().to_string(),
        "user_id": b.owner().to_string(),
        "name": b.name(),
        "description": b.description(),
        "created_at": b.created_at().to_rfc3339(),
        "updated_at": b.updated_at().to_rfc3339(),
    })
}
