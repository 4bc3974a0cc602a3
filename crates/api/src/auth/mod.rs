//! Authentication primitives.
//!
//! Token *issuance* (login, passwords, refresh) is handled by an
//! external identity service; this module only validates the HS256
//! access tokens that service signs, so handlers receive an
//! already-authenticated `(user_id, role)` pair.

pub mod jwt;
