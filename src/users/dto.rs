use serde::{Deserialize, Serialize};

use crate::users::repo_types::{ProfileUpdate, PublicUser};
use crate::validation::{
    check_email, check_min_len, check_not_empty, check_username, into_result, normalize_email,
    FieldError, Validate, MIN_PASSWORD_LEN,
};

/// Partial profile edit; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn normalize(&mut self) {
        if let Some(email) = self.email.as_mut() {
            *email = normalize_email(email);
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(username) = &self.username {
            check_username(&mut errors, username);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        into_result(errors)
    }
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_not_empty(
            &mut errors,
            "currentPassword",
            &self.current_password,
            "Current password is required",
        );
        check_min_len(
            &mut errors,
            "newPassword",
            &self.new_password,
            MIN_PASSWORD_LEN,
            "New password must be at least 6 characters long",
        );
        into_result(errors)
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}
