//! Well-known user role name constants.
//!
//! These must match the values stored in the `users.role` column.

/// Administrators receive operational alerts by default.
pub const ROLE_ADMIN: &str = "admin";

/// Plant operators manage day-to-day stock and deliveries.
pub const ROLE_OPERATOR: &str = "operator";

/// Read-only access.
pub const ROLE_VIEWER: &str = "viewer";
