//! Caller identity. Tokens are issued by the surrounding identity provider;
//! this side only verifies them.

pub mod claims;
pub mod extractors;
pub mod keys;

pub use extractors::AuthMember;
pub use keys::JwtKeys;
