/// API route handlers
///
/// - `info`: Service description at `/`
/// - `health`: Health check endpoint

pub mod health;
pub mod info;
