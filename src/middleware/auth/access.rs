//! Per-route permission guard.
//!
//! `guard()` wraps one method route with a layer that runs
//! `TokenValidator::authorize_request` before the handler. On success the
//! verified `Claims` go into request extensions (read by the `Caller`
//! extractor); on failure the request ends with the generic auth error envelope.
//!
//! ```ignore
//! .route("/drinks", get(list_drinks).merge(guard(post(create_drink), &state, "post:drinks")))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::TokenValidator;
use crate::state::AppState;

#[derive(Clone)]
pub struct PermissionGuard {
    validator: Arc<TokenValidator>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(validator: Arc<TokenValidator>, permission: &'static str) -> Self {
        Self {
            validator,
            permission,
        }
    }
}

/// Require `permission` for every request reaching `route`.
pub fn guard(
    route: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let guard = PermissionGuard::new(Arc::clone(&state.auth), permission);
    route.route_layer(middleware::from_fn_with_state(guard, require_permission))
}

async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match guard
        .validator
        .authorize_request(req.headers(), guard.permission)
        .await
    {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                kind = %err.kind(),
                status = err.status_code().as_u16(),
                permission = guard.permission,
                error = %err,
                "authorization failed"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        sub = claims.sub.as_deref().unwrap_or("-"),
        permission = guard.permission,
        "authorized"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
