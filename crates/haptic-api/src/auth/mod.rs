//! Authentication primitives.
//!
//! Two independent strategies, never interchangeable: end-user bearer
//! tokens ([`extract::AuthUser`]) and the worker fleet's shared secret
//! ([`extract::ServiceCaller`]).

pub mod extract;
pub mod password;
pub mod token;

pub use extract::{AuthUser, ServiceCaller};
pub use token::Claims;
