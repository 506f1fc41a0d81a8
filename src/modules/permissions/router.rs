use axum::{Router, routing::get};

use super::controller::{get_category_permissions, get_permissions};
use crate::state::AppState;

pub fn init_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_permissions))
        .route("/categories/{category}", get(get_category_permissions))
}
