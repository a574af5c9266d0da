//! Domain layer for the citizen request tracker.
//!
//! Everything in this crate is pure: no I/O, no database, no HTTP. The db and
//! api crates call into it to validate input and decide what a lifecycle
//! operation is allowed to do before anything is written.

pub mod account;
pub mod category;
pub mod district;
pub mod error;
pub mod lifecycle;
pub mod pagination;
pub mod photo;
pub mod roles;
pub mod types;
