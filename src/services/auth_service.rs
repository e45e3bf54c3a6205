// src/services/auth_service.rs

use crate::{
    common::error::AppError,
    models::auth::{ServiceStatus, UserStatus},
};

// Placeholder credentials. This module is not a security boundary.
const STUB_USERNAME: &str = "admin";
const STUB_PASSWORD: &str = "password123";

#[derive(Clone, Default)]
pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        Self
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            module: "auth".to_string(),
            status: "ok".to_string(),
            message: "Authentication module is up".to_string(),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        if username == STUB_USERNAME && password == STUB_PASSWORD {
            tracing::info!(username, "Login accepted");
            Ok(())
        } else {
            tracing::warn!(username, "Login rejected");
            Err(AppError::InvalidCredentials)
        }
    }

    /// Mock lookup: user 1 is the active admin, everyone else an inactive guest.
    pub fn user_status(&self, user_id: i64) -> UserStatus {
        let (status, username) = if user_id == 1 {
            ("active", STUB_USERNAME)
        } else {
            ("inactive", "guest")
        };
        UserStatus { user_id, status: status.to_string(), username: username.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_stub_pair_logs_in() {
        let auth = AuthService::new();
        assert!(auth.login("admin", "password123").is_ok());
        assert!(matches!(auth.login("admin", "wrong"), Err(AppError::InvalidCredentials)));
        assert!(matches!(auth.login("", ""), Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn user_lookup_has_two_outcomes() {
        let auth = AuthService::new();
        assert_eq!(auth.user_status(1).status, "active");
        assert_eq!(auth.user_status(1).username, "admin");
        assert_eq!(auth.user_status(2).status, "inactive");
        assert_eq!(auth.user_status(-5).username, "guest");
    }
}
