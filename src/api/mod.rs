pub mod dto;
pub mod extract;
pub mod handlers;
mod middleware;
pub mod routes;
pub mod templates;

pub use routes::{AppState, create_router};
