//! Request DTO validation.
//!
//! DTOs implement [`Validate`]; handlers take the body as
//! `Result<Json<T>, JsonRejection>` and pass it to [`extract_validated_json`],
//! so malformed JSON and rule violations come back in the same 400 shape.

use axum::{extract::rejection::JsonRejection, Json};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::AppError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
}

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

pub trait Validate {
    /// Canonicalize input before the rules run (e.g. email case).
    fn normalize(&mut self) {}

    /// Every rule is checked; all violations are reported together.
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn check_username(errors: &mut Vec<FieldError>, value: &str) {
    let len = value.chars().count();
    if !(3..=30).contains(&len) {
        errors.push(FieldError::new(
            "username",
            "Username must be between 3 and 30 characters",
        ));
    }
    if !USERNAME_RE.is_match(value) {
        errors.push(FieldError::new(
            "username",
            "Username can only contain letters, numbers, and underscores",
        ));
    }
}

pub fn check_email(errors: &mut Vec<FieldError>, value: &str) {
    if !is_valid_email(value) {
        errors.push(FieldError::new("email", "Please enter a valid email"));
    }
}

pub fn check_min_len(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, msg: &str) {
    if value.chars().count() < min {
        errors.push(FieldError::new(field, msg));
    }
}

pub fn check_not_empty(errors: &mut Vec<FieldError>, field: &str, value: &str, msg: &str) {
    if value.is_empty() {
        errors.push(FieldError::new(field, msg));
    }
}

pub fn into_result(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Unwrap a JSON body, reporting deserialization failures as a validation error on `body`.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::Validation(vec![FieldError::new("body", err.body_text())]))
}

pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let mut value = extract_json(result)?;
    value.normalize();
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}
