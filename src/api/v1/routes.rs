/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - どの method/route にどの permission が必要かをここで決める
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::v1::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};
use crate::middleware::auth::access::guard;
use crate::state::AppState;

pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).merge(guard(post(create_drink), state, permissions::POST_DRINKS)),
        )
        .route(
            "/drinks-detail",
            guard(
                get(list_drinks_detail),
                state,
                permissions::GET_DRINKS_DETAIL,
            ),
        )
        .route(
            "/drinks/{drink_id}",
            guard(patch(update_drink), state, permissions::PATCH_DRINKS).merge(guard(
                delete(delete_drink),
                state,
                permissions::DELETE_DRINKS,
            )),
        )
}
