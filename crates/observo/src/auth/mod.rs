//! Login gate.
//!
//! Two states, anonymous and authenticated, carried in a signed session
//! cookie. The signing key comes from the password, so changing the password
//! signs every session out. With neither username nor password configured
//! the guard lets everything through.

mod credentials;
pub mod guard;
pub mod session;

pub use credentials::{derive_secret, AuthError, Credentials};
pub use session::Session;
