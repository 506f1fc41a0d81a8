use axum::{Router, routing::get};

use super::controller::{get_role, get_roles};
use crate::state::AppState;

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_roles))
        .route("/{role}", get(get_role))
}
