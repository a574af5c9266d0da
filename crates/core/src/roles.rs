//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_roles_table.sql`.

use crate::types::DbId;

pub const ROLE_STAFF: &str = "staff";
pub const ROLE_CITIZEN: &str = "citizen";

/// Seeded id of the `staff` role.
pub const STAFF_ROLE_ID: DbId = 1;

/// Seeded id of the `citizen` role, assigned to every self-registered user.
pub const CITIZEN_ROLE_ID: DbId = 2;
