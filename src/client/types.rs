/**
 * Shared Types Module
 *
 * Request verbs, authentication payloads and the session credential used by
 * the gateway, the sync engine and the auth flow.
 */

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP verb of a gateway request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiMethod {
    /// Mutating requests are the ones that can be queued while offline
    pub fn operation(self) -> Option<OperationMethod> {
        match self {
            ApiMethod::Get => None,
            ApiMethod::Post => Some(OperationMethod::Create),
            ApiMethod::Put => Some(OperationMethod::Update),
            ApiMethod::Delete => Some(OperationMethod::Delete),
        }
    }

    pub fn is_mutating(self) -> bool {
        self.operation().is_some()
    }

    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            ApiMethod::Get => reqwest::Method::GET,
            ApiMethod::Post => reqwest::Method::POST,
            ApiMethod::Put => reqwest::Method::PUT,
            ApiMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// Kind of a queued mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationMethod {
    Create,
    Update,
    Delete,
}

impl OperationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationMethod::Create => "CREATE",
            OperationMethod::Update => "UPDATE",
            OperationMethod::Delete => "DELETE",
        }
    }
}

impl From<OperationMethod> for ApiMethod {
    fn from(method: OperationMethod) -> Self {
        match method {
            OperationMethod::Create => ApiMethod::Post,
            OperationMethod::Update => ApiMethod::Put,
            OperationMethod::Delete => ApiMethod::Delete,
        }
    }
}

impl FromStr for OperationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(OperationMethod::Create),
            "UPDATE" => Ok(OperationMethod::Update),
            "DELETE" => Ok(OperationMethod::Delete),
            other => Err(format!("unknown operation method '{}'", other)),
        }
    }
}

impl fmt::Display for OperationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authentication response from server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(deserialize_with = "id_as_string")]
    pub user_id: String,
}

/// Bearer token plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub user_id: String,
}

impl From<AuthResponse> for Credential {
    fn from(value: AuthResponse) -> Self {
        Self {
            access_token: value.access_token,
            user_id: value.user_id,
        }
    }
}

// The server sends numeric ids; the mirror scopes records by a string key.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
