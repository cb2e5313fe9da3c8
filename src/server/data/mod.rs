//! Database repositories.
//!
//! Each repository is a thin wrapper over a `ConnectionTrait` reference, so the same
//! methods run against the pool or inside a transaction.

pub mod attendance;
pub mod child;
pub mod guardian;
pub mod message;
pub mod program;
pub mod scan_code;
pub mod unlinked_contact;
