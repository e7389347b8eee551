pub mod project;
pub mod rest;
pub mod state;

// Re-export the gateway handlers to make them easily accessible to the
// binary that builds the web server router.
pub use rest::{ai_handler, ai_health_handler};
