use axum::{
    Router, middleware,
    routing::{MethodRouter, get, post, put},
};

use crate::entity::role_permission::{CATEGORY_MANAGE, SUB_CATEGORY_MANAGE};
use crate::extractors::auth::{PermissionGate, require_permission};
use crate::handlers;
use crate::state::AppState;

/// All `/api` routes. Write endpoints sit behind a [`PermissionGate`].
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(category_routes(state))
        .merge(sub_category_routes(state))
        .merge(image_routes(state))
}

fn gated(
    state: &AppState,
    permission: &'static str,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        PermissionGate::new(&state.config.auth, permission),
        require_permission,
    ))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn category_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/category",
            gated(state, CATEGORY_MANAGE, post(handlers::category::create_category)),
        )
        .route("/categories", get(handlers::category::list_categories))
        .route("/category/{category_id}", get(handlers::category::get_category))
}

fn sub_category_routes(state: &AppState) -> Router<AppState> {
    use handlers::sub_category::*;

    Router::new()
        .route(
            "/category/{category_id}/sub-category",
            gated(state, SUB_CATEGORY_MANAGE, post(create_sub_category)),
        )
        .route(
            "/category/{category_id}/sub-categories",
            get(list_sub_categories_by_category),
        )
        .route("/sub-categories", get(list_sub_categories))
        .route(
            "/sub-category/{sub_category_id}",
            get(get_sub_category).merge(gated(
                state,
                SUB_CATEGORY_MANAGE,
                put(update_sub_category).delete(delete_sub_category),
            )),
        )
}

fn image_routes(state: &AppState) -> Router<AppState> {
    use handlers::image::*;

    Router::new()
        .route(
            "/sub-category/image/upload/{sub_category_id}",
            gated(state, SUB_CATEGORY_MANAGE, post(upload_image))
                .layer(image_upload_body_limit(&state.config.storage)),
        )
        .route("/sub-category/image/{image_url}", get(download_image))
}
