pub mod analyzer;
pub mod anonymizer;
pub mod api;
pub mod files;
pub mod pii;
pub mod utils;
