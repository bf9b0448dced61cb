pub mod base64;
pub mod url;

// Re-export common utilities
pub use url::{url_decode, url_encode};
