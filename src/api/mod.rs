// HTTP surface: public storefront reads, review submission and the
// session-gated admin dashboard API

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod spa;

pub use server::{build_app, ApiServer, AppState};
