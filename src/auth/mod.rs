//! Client-side view of the bearer token: payload decoding and role routing.
//!
//! The backend signs and re-validates every token; nothing here checks
//! signatures or expiry.

pub mod router;
pub mod token;

pub use router::{landing_route, Role, ADMIN_ROLE, CONSULTANT_ROLE};
pub use token::{decode_claims, Claims, TokenError};
