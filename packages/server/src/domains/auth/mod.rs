//! Auth domain - bearer tokens for users and stores
//!
//! Responsibilities:
//! - JWT creation and verification (separate `kind` tag per guard)
//! - Token revocation on logout (jti denylist held in the cache store)

pub mod jwt;

pub use jwt::{Claims, JwtService, TokenKind};

/// Cache-key prefix for revoked token ids.
pub const REVOKED_TOKEN_PREFIX: &str = "revoked_token_";

/// `token_type` label for merchant bearer tokens.
pub const STORE_TOKEN_TYPE: &str = "store-token";
