mod delete;
mod patch;
mod upsert;
mod view;

use axum::{Router, routing::get};

use crate::AppState;

pub use delete::delete_user;
pub use patch::{FIELD_ROUTES, REQUIRED_ON_CREATE, Target, UserPatch, route};
pub use upsert::upsert_user;
pub use view::{UserView, fetch_user_view};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/users/{auth_user_uuid}",
        get(view::get_user)
            .put(upsert::put_user)
            .delete(delete::del_user),
    )
}
