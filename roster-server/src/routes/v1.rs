use axum::{
    Router,
    routing::{get, patch},
};

use crate::{AppState, users::user_handlers};

/// Create all v1 API routes.
///
/// `{identifier}` carries a mail for reads and profile updates and a
/// numeric id for the lifecycle endpoints. Both shapes share one path
/// position, so the segment is parsed per handler; id-keyed handlers
/// reject non-numeric identifiers with 400.
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            get(user_handlers::list_users_handler).post(user_handlers::create_user_handler),
        )
        .route(
            "/user/{identifier}",
            get(user_handlers::get_user_by_mail_handler)
                .put(user_handlers::update_user_handler)
                .patch(user_handlers::deactivate_user_handler)
                .delete(user_handlers::delete_user_handler),
        )
        .route(
            "/user/{identifier}/{active}",
            patch(user_handlers::activate_user_handler),
        )
}
