//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update DTOs for inserts and patches
//! - Safe response shapes where the row carries secrets

pub mod category;
pub mod request;
pub mod role;
pub mod session;
pub mod user;
