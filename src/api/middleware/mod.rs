pub mod auth;
pub mod cors;
pub mod rate_limiting;
pub mod upload;

pub use rate_limiting::LoginRateLimiter;
pub use upload::{read_multipart, MultipartForm, IMAGE_FIELD};
