use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use chrono::{DateTime, Utc};

use super::model::User;
use super::schema::ErrorResponse;

pub type Result<T> = std::result::Result<T, AuthError>;

/// User persistence seam. Production is backed by MySQL; tests inject an
/// in-memory double.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. The store's unique constraints on email and phone
    /// are the backstop for concurrent registrations.
    async fn insert(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Pre-insert duplicate check. Phone only participates when present.
    async fn email_or_phone_exists(
        &self,
        email: &str,
        phone_number: Option<&str>,
    ) -> Result<bool>;

    /// Token-only lookup; expiry is judged by the caller so an expired token
    /// can be reported distinctly from an unknown one.
    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>>;

    /// Flips the user to verified and clears the verification token.
    async fn mark_verified(&self, user_id: &str) -> Result<()>;

    /// Replaces any outstanding verification token.
    async fn set_verification_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Replaces any outstanding reset token.
    async fn set_reset_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Stores a new password hash and clears the reset token.
    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email or phone number already registered")]
    DuplicateUser,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account does not match the requested role")]
    RoleMismatch,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Invalid verification token")]
    InvalidVerificationToken,

    #[error("Verification token has expired")]
    VerificationTokenExpired,

    #[error("Email already verified")]
    AlreadyVerified,

    #[error("Invalid or unknown reset token")]
    InvalidResetToken,

    #[error("Reset token has expired")]
    ResetTokenExpired,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Email delivery failed: {0}")]
    Mail(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateUser | Self::AlreadyVerified => StatusCode::CONFLICT,
            Self::UserNotFound
            | Self::InvalidVerificationToken
            | Self::VerificationTokenExpired
            | Self::InvalidResetToken
            | Self::ResetTokenExpired => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::RoleMismatch | Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Hashing(_) | Self::Token(_) | Self::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Unexpected failures get logged and reported generically.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("auth workflow failed: {self}");
            "Something went wrong".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
