pub mod analytics;
pub mod health;
pub mod insights;
pub mod movements;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
