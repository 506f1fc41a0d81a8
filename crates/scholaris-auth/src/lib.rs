//! # Scholaris Auth
//!
//! Access token claims and the JWT helpers that issue and verify them.
//!
//! The token names the caller and the role they held when it was issued.
//! It does not carry permissions: the API reloads the caller's current role
//! on every request and derives permissions from the role template, so a role
//! change applies immediately.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_auth::{create_access_token, verify_token};
//! use scholaris_config::JwtConfig;
//! use scholaris_core::SystemRole;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "head@school.test", SystemRole::Admin, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, SystemRole::Admin);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
