//! Layer-based authorization.
//!
//! Where [`crate::require_permission!`] extractors guard a single handler,
//! these functions guard whole routers through
//! `axum::middleware::from_fn_with_state`.
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use crate::middleware::permission::require_role_view;
//!
//! let catalogue = Router::new()
//!     .route("/", get(list_permissions))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_role_view));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use scholaris_core::{AccessMode, AppError, Permission};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Authenticates the caller and checks `required` under `mode` before
/// running the inner service. Denials never reach the handler.
pub async fn require_permissions(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    required: &[Permission],
    mode: AccessMode,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !auth_user.authorize(required, mode) {
        let tokens: Vec<&str> = required.iter().map(|p| p.as_str()).collect();
        tracing::warn!(
            user_id = %auth_user.user_id,
            role = %auth_user.role,
            required = ?tokens,
            ?mode,
            "Permission denied"
        );
        return Err(AppError::forbidden(format!(
            "Access denied. Required permissions ({:?}): {}",
            mode,
            tokens.join(", ")
        )));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

/// Guard for the read-only catalogue and role template routes.
pub async fn require_role_view(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_permissions(
        State(state),
        req,
        next,
        &[Permission::RoleView],
        AccessMode::All,
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
