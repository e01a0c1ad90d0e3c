//! HTTP API handlers for roracle-ui

pub mod health;
pub mod results;

pub use health::health_routes;
pub use results::results_routes;
pub use tests::tests_routes;
