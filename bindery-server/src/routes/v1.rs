use axum::{Router, middleware, routing::get};

use crate::handlers::{
    create_read_list_handler, delete_read_list_handler, get_library_handler,
    get_read_list_handler, list_libraries_handler, list_read_list_books_handler,
    list_read_lists_handler, update_read_list_handler,
};
use crate::infra::{app_state::AppState, auth::auth_middleware};

/// Create all v1 API routes. Every route requires an API key.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/readlists",
            get(list_read_lists_handler).post(create_read_list_handler),
        )
        .route(
            "/readlists/{id}",
            get(get_read_list_handler)
                .patch(update_read_list_handler)
                .delete(delete_read_list_handler),
        )
        .route("/readlists/{id}/books", get(list_read_list_books_handler))
        .route("/libraries", get(list_libraries_handler))
        .route("/libraries/{id}", get(get_library_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
