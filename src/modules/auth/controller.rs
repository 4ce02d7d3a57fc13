use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::extract::AppJson;
use crate::modules::auth::{
    interface::AuthError,
    model::{Role, User, DEFAULT_PROFILE_PICTURE},
    schema::{
        ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
        RegisterRequest, RegisterResponse, ResendEmailRequest, ResendEmailResponse,
        ResetPasswordRequest, ResetPasswordResponse, SessionUser, VerifyEmailResponse,
    },
};
use crate::services::{hashing, mail, token};
use crate::AppState;

const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;
const RESET_TOKEN_TTL_HOURS: i64 = 1;

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let email = req.email.trim().to_lowercase();
    let phone_number = req
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from);

    if state
        .users
        .email_or_phone_exists(&email, phone_number.as_deref())
        .await?
    {
        return Err(AuthError::DuplicateUser);
    }

    let password_hash =
        hashing::hash_password(&req.password).map_err(|e| AuthError::Hashing(e.to_string()))?;

    let verification_token = token::generate_token();
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        full_name: req.full_name.trim().to_string(),
        email,
        phone_number,
        password_hash,
        role: req.role.unwrap_or(Role::Tenant),
        profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        is_verified: false,
        verification_token: Some(verification_token.clone()),
        verification_token_expires: Some(now + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS)),
        reset_password_token: None,
        reset_password_expires: None,
        created_at: now,
        updated_at: now,
    };

    // The unique constraints are the backstop for two concurrent
    // registrations that both pass the pre-check; the second insert
    // surfaces as DuplicateUser.
    state.users.insert(&user).await?;

    let link = format!(
        "{}/verify-email/{}",
        state.frontend_url, verification_token
    );
    let (subject, body) = mail::verification_email(&user.full_name, &link);
    state
        .mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(|e| AuthError::Mail(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully",
            user: user.into(),
        }),
    ))
}

pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<VerifyEmailResponse>), AuthError> {
    // Lookup is by token only; expiry is judged here so an expired token is
    // reported distinctly from an unknown one.
    let user = state
        .users
        .find_by_verification_token(&token)
        .await?
        .ok_or(AuthError::InvalidVerificationToken)?;

    match user.verification_token_expires {
        Some(expires_at) if Utc::now() <= expires_at => {}
        _ => return Err(AuthError::VerificationTokenExpired),
    }

    if user.is_verified {
        return Err(AuthError::AlreadyVerified);
    }

    state.users.mark_verified(&user.id).await?;

    Ok((
        StatusCode::OK,
        Json(VerifyEmailResponse {
            success: true,
            message: "Email verified successfully",
        }),
    ))
}

pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ResendEmailRequest>,
) -> Result<(StatusCode, Json<ResendEmailResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let email = req.email.trim().to_lowercase();
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if user.is_verified {
        return Err(AuthError::AlreadyVerified);
    }

    // A fresh token supersedes any outstanding one.
    let verification_token = token::generate_token();
    let expires_at = Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS);
    state
        .users
        .set_verification_token(&user.id, &verification_token, expires_at)
        .await?;

    let link = format!(
        "{}/verify-email/{}",
        state.frontend_url, verification_token
    );
    let (subject, body) = mail::verification_email(&user.full_name, &link);
    state
        .mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(|e| AuthError::Mail(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ResendEmailResponse {
            success: true,
            message: "Verification email sent",
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let email = req.email.trim().to_lowercase();
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if user.role != req.role {
        return Err(AuthError::RoleMismatch);
    }

    if !user.is_verified {
        return Err(AuthError::EmailNotVerified);
    }

    let password_ok = hashing::verify_password(&req.password, &user.password_hash)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    if !password_ok {
        return Err(AuthError::InvalidCredentials);
    }

    let session_token = state
        .jwt_service
        .create_session_token(&user.id, &user.email, user.role)
        .map_err(|e| AuthError::Token(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "Login successful",
            token: session_token,
            user: SessionUser {
                full_name: user.full_name,
                email: user.email,
                profile_picture: user.profile_picture,
                role: user.role,
            },
        }),
    ))
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<ForgotPasswordResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let email = req.email.trim().to_lowercase();
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let reset_token = token::generate_token();
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    state
        .users
        .set_reset_token(&user.id, &reset_token, expires_at)
        .await?;

    // The token travels only through the email channel, never in the
    // response body.
    let link = format!("{}/reset-password/{}", state.frontend_url, reset_token);
    let (subject, body) = mail::reset_password_email(&link);
    state
        .mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(|e| AuthError::Mail(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ForgotPasswordResponse {
            success: true,
            message: "Password reset email sent",
        }),
    ))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> Result<(StatusCode, Json<ResetPasswordResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = state
        .users
        .find_by_reset_token(&req.token)
        .await?
        .ok_or(AuthError::InvalidResetToken)?;

    match user.reset_password_expires {
        Some(expires_at) if Utc::now() <= expires_at => {}
        _ => return Err(AuthError::ResetTokenExpired),
    }

    let password_hash =
        hashing::hash_password(&req.password).map_err(|e| AuthError::Hashing(e.to_string()))?;

    // Also clears the reset token; it is single use.
    state.users.update_password(&user.id, &password_hash).await?;

    Ok((
        StatusCode::OK,
        Json(ResetPasswordResponse {
            success: true,
            message: "Password reset successfully",
        }),
    ))
}
