//! Ownership-scoped data access.
//!
//! Every query here carries the caller's user id in its predicate: pets
//! directly, vaccinations and events through a sub-select on the caller's
//! pets. A record that exists but belongs to someone else is reported exactly
//! like a missing one.

pub mod event;
pub mod ownership;
pub mod pet;
pub mod vaccination;
