// server/src/web/handlers/mod.rs

// Declare handler modules
pub mod catalog_handlers;
pub mod ping_handlers;
pub mod vendor_handlers;
