pub mod scan;

// Re-export common types
pub use scan::*;
