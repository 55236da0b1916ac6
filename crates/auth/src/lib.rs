//! Authorization boundary for lifecycle operations.
//!
//! Credentials are validated elsewhere; this crate only decides whether an
//! already-identified principal may perform an operation.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, AuthzError};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
