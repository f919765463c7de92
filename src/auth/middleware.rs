use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::AppState;

/// The authenticated caller. Handlers pass `id` explicitly into every
/// repository call.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    #[allow(dead_code)]
    pub email: Option<String>,
    pub is_demo: bool,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(token, &state.config)?;
    let claims = token_data.claims;

    let auth_user = AuthUser {
        id: claims.sub,
        is_demo: state.config.is_demo_email(claims.email.as_deref()),
        email: claims.email.filter(|e| !e.is_empty()),
    };

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}
