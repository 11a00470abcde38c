//! Stateless signed sessions.
//!
//! The server never persists sessions; the client holds the only copy, an
//! HMAC-SHA256-signed cookie value produced by [`codec`] and carried by the
//! cookie builders in [`cookie`].

pub mod codec;
pub mod cookie;

pub use codec::SessionPayload;
