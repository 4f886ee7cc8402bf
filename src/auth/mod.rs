//! Authentication module for Account Hub.
//!
//! Accounts log in with their account number and a bcrypt-checked
//! password, and receive a JWT for the protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::*;
pub use middleware::*;
pub use password::*;
