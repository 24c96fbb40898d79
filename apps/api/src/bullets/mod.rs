// Bullet normalization: free-form or list-shaped input → clean single-idea bullets.
// Pure and synchronous; handlers only wrap it for HTTP.

pub mod handlers;
pub mod normalizer;
