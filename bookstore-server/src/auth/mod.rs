//! Authentication and authorization
//!
//! - [`JwtService`]: token issue and verification
//! - [`password`]: PBKDF2 hashing and temporary passwords
//! - [`CurrentUser`] / [`OptionalUser`]: request user extractors
//! - [`require_auth`], [`require_role`], [`require_admin`]: middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use extractor::{CurrentUser, OptionalUser};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{STAFF, is_public_route, require_admin, require_auth, require_role};
