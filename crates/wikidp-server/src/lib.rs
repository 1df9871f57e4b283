//! WikiDP server — differentially private top-article pageviews over HTTP.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
