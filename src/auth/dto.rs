use serde::{Deserialize, Serialize};

use crate::users::repo_types::PublicUser;
use crate::validation::{
    check_email, check_min_len, check_not_empty, check_username, into_result, normalize_email,
    FieldError, Validate, MIN_PASSWORD_LEN,
};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_username(&mut errors, &self.username);
        check_email(&mut errors, &self.email);
        check_min_len(
            &mut errors,
            "password",
            &self.password,
            MIN_PASSWORD_LEN,
            "Password must be at least 6 characters long",
        );
        into_result(errors)
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&mut errors, &self.email);
        check_not_empty(&mut errors, "password", &self.password, "Password is required");
        into_result(errors)
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_collects_every_violation() {
        let req = RegisterRequest {
            username: "a".into(),
            email: "nope".into(),
            password: "123".into(),
        };
        let errors = req.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn login_normalizes_email_before_validating() {
        let mut req = LoginRequest {
            email: "  A@X.COM ".into(),
            password: "secret1".into(),
        };
        req.normalize();
        assert_eq!(req.email, "a@x.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "a@x.com".into(),
            password: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::new("password", "Password is required")]);
    }
}
