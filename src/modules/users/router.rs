use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    assign_user_role, create_user, get_user, get_user_role_history, get_users,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user))
        .route("/{id}/role", put(assign_user_role))
        .route("/{id}/role-history", get(get_user_role_history))
}
