use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{auth::services::is_valid_email, error::AppError};

/// Request body for user registration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// 3 to 50 characters.
    #[schema(example = "Ann Example")]
    pub name: String,
    #[schema(example = "ann@example.com")]
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Normalizes the email and checks field bounds.
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.email = self.email.trim().to_lowercase();
        self.name = self.name.trim().to_string();

        let name_len = self.name.chars().count();
        if !(3..=50).contains(&name_len) {
            return Err(AppError::validation("Name must be between 3 and 50 characters"));
        }
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        Ok(())
    }
}

/// Request body for login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.email = self.email.trim().to_lowercase();
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        Ok(())
    }
}

fn check_email(email: &str) -> Result<(), AppError> {
    let len = email.chars().count();
    if !(1..=50).contains(&len) || !is_valid_email(email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(())
}

/// User as echoed back after registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
    pub user: RegisteredUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
}
