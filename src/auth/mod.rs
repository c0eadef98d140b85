use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod password;
pub mod repo;
pub mod session;
pub(crate) mod extractors;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
