pub mod analytics;
pub mod filters;
pub mod insights;
pub mod movements;
