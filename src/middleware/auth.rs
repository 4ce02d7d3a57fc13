use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::modules::auth::model::Role;
use crate::modules::auth::schema::ErrorResponse;
use crate::AppState;

/// Authenticated identity attached to the request once the session token
/// checks out.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return unauthorized("Unauthorized");
    };

    // Fails closed: a bad signature or expired token is a rejection, never a
    // partial identity.
    match state.jwt_service.verify_session_token(token) {
        Ok(data) => {
            request.extensions_mut().insert(AuthUser {
                user_id: data.claims.sub,
                email: data.claims.email,
                role: data.claims.role,
            });
            next.run(request).await
        }
        Err(_) => unauthorized("Authentication failed"),
    }
}

/// Explicit set-membership check of the authenticated role against the
/// route's allow-list.
pub async fn require_role(allowed: &'static [Role], request: Request, next: Next) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return unauthorized("Unauthorized");
    };

    if allowed.contains(&user.role) {
        next.run(request).await
    } else {
        (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(
                "You are not permitted to access this route",
            )),
        )
            .into_response()
    }
}
