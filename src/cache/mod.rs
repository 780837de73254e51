pub mod division_cache;
pub mod types;

// Re-export cache types
pub use types::*;
// Re-export the caching decorator
pub use division_cache::*;
