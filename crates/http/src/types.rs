//! Wire types shared by the auth endpoints

use depot_core::{Session, User};
use serde::{Deserialize, Serialize};

/// Standard success envelope: `{ "result": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub result: T,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or phone number
    pub email_or_phone: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email_or_phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email_or_phone: email_or_phone.into(),
            password: password.into(),
        }
    }
}

/// `result` of a successful login: tokens plus every user field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(flatten)]
    pub user: User,
}

impl LoginResult {
    pub fn session(&self) -> Session {
        Session::new(&self.access_token, &self.refresh_token)
    }
}

/// Token renewal request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `result` of a successful renewal
pub type RefreshResult = Session;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_uses_camel_case() {
        let body = serde_json::to_value(LoginRequest::new("0771234567", "secret")).unwrap();
        assert_eq!(body, json!({"emailOrPhone": "0771234567", "password": "secret"}));
    }

    #[test]
    fn test_login_result_splits_tokens_from_user() {
        let envelope: Envelope<LoginResult> = serde_json::from_value(json!({
            "result": {
                "accessToken": "A1",
                "refreshToken": "R1",
                "_id": "u-7",
                "name": "Kasun",
                "role": "SALES_REP"
            }
        }))
        .unwrap();

        let login = envelope.result;
        assert_eq!(login.session(), Session::new("A1", "R1"));
        assert_eq!(login.user.id.as_deref(), Some("u-7"));
        assert!(!login.user.extra.contains_key("accessToken"));
    }
}
