// server/src/web/mod.rs

// Declare child modules
pub mod handlers;
pub mod params;
pub mod routes;

// Re-exported so main.rs and the integration tests share one routing setup.
pub use routes::configure_app_routes;
