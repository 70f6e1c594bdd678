// Common types and utilities shared across the application

pub mod response;
pub mod validate;

pub use response::{status, ApiResponse, TokenPayload};
pub use validate::is_valid_mobile;
