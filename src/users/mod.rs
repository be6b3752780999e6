use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

#[cfg(test)]
pub mod memory;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
