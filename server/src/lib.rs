//! Web front-end for the math tutor: routes, request flows and page rendering.

pub mod coordinator;
pub mod http_server;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

pub use http_server::{build_router, run_server, AppState};
